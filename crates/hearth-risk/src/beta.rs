//! Portfolio beta against a market index.
//!
//! Beta_i = Cov(R_i, R_m) / Var(R_m), taken from one joint covariance matrix
//! over all asset columns plus the market column. The portfolio beta is the
//! arithmetic mean of the asset betas, matching an equal-weight allocation.
//!
//! Asset and market series may have different lengths. They are paired with
//! [`hearth_factors::align_trailing`]: both are cut to the shorter length and
//! the most recent observations are kept.

use crate::covariance::{CovarianceError, CovarianceEstimator, SampleCovarianceEstimator};
use hearth_factors::align_trailing;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of a beta estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaEstimate {
    /// Beta of each asset, in input order.
    pub betas: Vec<f64>,
    /// Mean of `betas`.
    pub portfolio_beta: f64,
    /// Number of aligned return observations used.
    pub observations: usize,
    /// Sample variance of the aligned market returns.
    pub market_variance: f64,
}

/// Estimate beta with the sample covariance estimator.
///
/// `assets` holds one return series per asset; all must share a length.
pub fn portfolio_beta(
    assets: &[Vec<f64>],
    market: &[f64],
) -> Result<BetaEstimate, CovarianceError> {
    portfolio_beta_with(&SampleCovarianceEstimator, assets, market)
}

/// Estimate beta with a specific covariance estimator.
pub fn portfolio_beta_with<E: CovarianceEstimator + ?Sized>(
    estimator: &E,
    assets: &[Vec<f64>],
    market: &[f64],
) -> Result<BetaEstimate, CovarianceError> {
    let Some(first) = assets.first() else {
        return Err(CovarianceError::NoAssets);
    };
    if let Some(bad) = assets.iter().find(|a| a.len() != first.len()) {
        return Err(CovarianceError::DimensionMismatch {
            expected: first.len(),
            actual: bad.len(),
        });
    }

    let (_, market) = align_trailing(first, market);
    let n_periods = market.len();
    let n_assets = assets.len();

    let mut joint = Array2::<f64>::zeros((n_periods, n_assets + 1));
    for (j, asset) in assets.iter().enumerate() {
        let (asset, _) = align_trailing(asset, market);
        for (t, r) in asset.iter().enumerate() {
            joint[[t, j]] = *r;
        }
    }
    for (t, r) in market.iter().enumerate() {
        joint[[t, n_assets]] = *r;
    }

    let cov = estimator.estimate(&joint)?;
    let market_variance = cov[[n_assets, n_assets]];
    if !(market_variance.is_finite() && market_variance > 0.0) {
        warn!(market_variance, observations = n_periods, "market returns have no variance");
        return Err(CovarianceError::DegenerateMarket);
    }

    let betas: Vec<f64> = (0..n_assets)
        .map(|j| cov[[j, n_assets]] / market_variance)
        .collect();
    let portfolio_beta = betas.iter().sum::<f64>() / n_assets as f64;
    debug!(assets = n_assets, observations = n_periods, portfolio_beta, "beta estimated");

    Ok(BetaEstimate {
        betas,
        portfolio_beta,
        observations: n_periods,
        market_variance,
    })
}
