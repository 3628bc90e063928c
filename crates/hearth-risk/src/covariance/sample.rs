//! Sample covariance estimator.
//!
//! Unbiased estimator with `ddof = 1`:
//! Cov(i,j) = Σ_t (r_{t,i} - mean_i)(r_{t,j} - mean_j) / (T - 1)

use super::{CovarianceError, CovarianceEstimator};
use ndarray::{Array2, Axis};

/// Equal-weight sample covariance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCovarianceEstimator;

impl CovarianceEstimator for SampleCovarianceEstimator {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        let n_periods = returns.nrows();
        if n_periods < 2 {
            return Err(CovarianceError::InsufficientData {
                required: 2,
                actual: n_periods,
            });
        }

        let Some(means) = returns.mean_axis(Axis(0)) else {
            return Err(CovarianceError::InsufficientData {
                required: 2,
                actual: 0,
            });
        };
        let centered = returns - &means;
        let cov = centered.t().dot(&centered) / (n_periods - 1) as f64;

        Ok(cov)
    }
}
