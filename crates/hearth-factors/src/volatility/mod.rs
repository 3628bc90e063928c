//! Volatility measures and the tier classifier built on them.
//!
//! Each ticker's realized volatility over the full window decides which risk
//! tier it belongs to. Lower volatility tickers make up the stable tier.

pub mod historical_vol;
pub mod tiers;

pub use historical_vol::{HistoricalVolatility, HistoricalVolatilityConfig};
pub use tiers::{
    ClassifierError, TickerVolatility, TierConfig, TierCutoffs, VolatilityClassifier,
    VolatilityTier, VolatilityTiers,
};
