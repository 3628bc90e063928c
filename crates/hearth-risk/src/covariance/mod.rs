//! Covariance estimation
//!
//! Return series are laid out as columns of a `T x N` matrix, one row per
//! period.

pub mod sample;

pub use sample::SampleCovarianceEstimator;

use ndarray::Array2;
use thiserror::Error;

/// Errors that can occur during covariance estimation
#[derive(Debug, Error)]
pub enum CovarianceError {
    /// Insufficient data for estimation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// The market series has zero variance, so beta is undefined.
    #[error("Market variance is zero")]
    DegenerateMarket,

    /// No asset series were supplied.
    #[error("No asset return series supplied")]
    NoAssets,
}

/// Trait for covariance matrix estimators
pub trait CovarianceEstimator {
    /// Estimate the covariance matrix from returns
    ///
    /// # Arguments
    /// * `returns` - Matrix where each row is a time period and each column is a series
    ///
    /// # Returns
    /// * Estimated covariance matrix (N x N where N is number of series)
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError>;
}
