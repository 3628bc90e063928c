//! Error types for the engine.

use crate::config::ConfigError;
use hearth_data::DataError;
use hearth_factors::ClassifierError;
use hearth_risk::CovarianceError;
use thiserror::Error;

/// Errors from analyzing one portfolio.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The tier behind a portfolio has no tickers
    #[error("Portfolio {portfolio} has no tickers")]
    EmptyTier {
        /// Portfolio display name
        portfolio: String,
    },

    /// A ticker is not in the price panel
    #[error("Ticker {0} is not in the price panel")]
    UnknownTicker(String),

    /// Not enough aligned returns to estimate beta
    #[error("Insufficient data: {observations} aligned returns, need at least {required}")]
    InsufficientData {
        /// Observations available
        observations: usize,
        /// Observations required
        required: usize,
    },

    /// Covariance estimation failed
    #[error(transparent)]
    Beta(#[from] CovarianceError),

    /// Analysis did not finish in time
    #[error("Analysis timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The analysis task was cancelled or panicked
    #[error("Analysis task failed: {0}")]
    Task(String),
}

/// Errors from building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Price retrieval failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Volatility classification failed
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// Configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Portfolio analysis failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
