#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hearth-quant/hearth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod returns;
pub mod stats;
pub mod volatility;

pub use returns::{align_trailing, simple_returns};
pub use volatility::{
    ClassifierError, HistoricalVolatility, HistoricalVolatilityConfig, TickerVolatility,
    TierConfig, TierCutoffs, VolatilityClassifier, VolatilityTier, VolatilityTiers,
};
