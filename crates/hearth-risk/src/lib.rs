#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hearth-quant/hearth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod beta;
pub mod capm;
pub mod covariance;
pub mod profile;

// Re-export main types
pub use beta::{BetaEstimate, portfolio_beta};
pub use capm::CapmConfig;
pub use covariance::{CovarianceError, CovarianceEstimator, SampleCovarianceEstimator};
pub use profile::{Answer, Household, RespondentAnswer, RiskProfile, classify};
