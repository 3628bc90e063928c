//! Volatility tiers.
//!
//! Tickers are ranked by annualized volatility and split at two quantile cut
//! points (33rd and 66th percentile by default):
//!
//! - `v <= lower`         → stable
//! - `lower < v <= upper` → middle
//! - `v > upper`          → growth
//!
//! Tickers with undefined volatility are left out of the ranking and reported
//! as unclassified. Within a tier, tickers are ordered by ascending volatility
//! with the ticker name breaking ties.

use super::historical_vol::HistoricalVolatility;
use crate::stats::quantile_sorted;
use hearth_data::PricePanel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors raised while classifying a universe.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// Quantiles must satisfy `0 < lower < upper < 1`.
    #[error("Invalid tier quantiles: lower {lower}, upper {upper}")]
    InvalidQuantiles {
        /// Lower cut quantile
        lower: f64,
        /// Upper cut quantile
        upper: f64,
    },

    /// No ticker had a defined volatility.
    #[error("No ticker has enough history to compute volatility ({unclassified} unclassified)")]
    NothingToClassify {
        /// Number of tickers without a volatility
        unclassified: usize,
    },

    /// Unknown tier label.
    #[error("Unknown volatility tier: {0}")]
    UnknownTier(String),
}

/// A volatility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityTier {
    /// Lowest third by volatility.
    Stable,
    /// Middle third.
    Middle,
    /// Highest third.
    Growth,
}

impl VolatilityTier {
    /// All tiers, lowest volatility first.
    pub const ALL: [Self; 3] = [Self::Stable, Self::Middle, Self::Growth];

    /// Lowercase label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Middle => "middle",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VolatilityTier {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "middle" => Ok(Self::Middle),
            "growth" => Ok(Self::Growth),
            _ => Err(ClassifierError::UnknownTier(s.to_string())),
        }
    }
}

/// Quantile cut points for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Upper bound quantile of the stable tier (default: 0.33)
    pub lower_quantile: f64,
    /// Upper bound quantile of the middle tier (default: 0.66)
    pub upper_quantile: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            lower_quantile: 0.33,
            upper_quantile: 0.66,
        }
    }
}

impl TierConfig {
    /// Check `0 < lower < upper < 1`.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let (lower, upper) = (self.lower_quantile, self.upper_quantile);
        if lower > 0.0 && lower < upper && upper < 1.0 {
            Ok(())
        } else {
            Err(ClassifierError::InvalidQuantiles { lower, upper })
        }
    }
}

/// A ticker with its annualized volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerVolatility {
    /// Ticker symbol.
    pub ticker: String,
    /// Annualized volatility.
    pub volatility: f64,
}

/// Volatility values at the tier boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCutoffs {
    /// Volatility at the lower quantile.
    pub lower: f64,
    /// Volatility at the upper quantile.
    pub upper: f64,
}

impl TierCutoffs {
    /// Tier for a volatility value.
    pub fn tier_for(&self, volatility: f64) -> VolatilityTier {
        if volatility <= self.lower {
            VolatilityTier::Stable
        } else if volatility <= self.upper {
            VolatilityTier::Middle
        } else {
            VolatilityTier::Growth
        }
    }
}

/// Partition of a universe into three volatility tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityTiers {
    stable: Vec<TickerVolatility>,
    middle: Vec<TickerVolatility>,
    growth: Vec<TickerVolatility>,
    unclassified: Vec<String>,
    cutoffs: TierCutoffs,
}

impl VolatilityTiers {
    /// Members of a tier, lowest volatility first.
    pub fn members(&self, tier: VolatilityTier) -> &[TickerVolatility] {
        match tier {
            VolatilityTier::Stable => &self.stable,
            VolatilityTier::Middle => &self.middle,
            VolatilityTier::Growth => &self.growth,
        }
    }

    /// Ticker symbols of a tier.
    pub fn tickers(&self, tier: VolatilityTier) -> Vec<String> {
        self.members(tier).iter().map(|m| m.ticker.clone()).collect()
    }

    /// Tier containing `ticker`, if it was classified.
    pub fn tier_of(&self, ticker: &str) -> Option<VolatilityTier> {
        VolatilityTier::ALL
            .into_iter()
            .find(|&tier| self.members(tier).iter().any(|m| m.ticker == ticker))
    }

    /// Tickers left out because their volatility is undefined.
    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    /// The cut points used.
    pub const fn cutoffs(&self) -> TierCutoffs {
        self.cutoffs
    }

    /// Number of classified tickers.
    pub fn len(&self) -> usize {
        self.stable.len() + self.middle.len() + self.growth.len()
    }

    /// Whether no ticker was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a universe into volatility tiers.
#[derive(Debug, Clone, Default)]
pub struct VolatilityClassifier {
    volatility: HistoricalVolatility,
    config: TierConfig,
}

impl VolatilityClassifier {
    /// Create a classifier, validating the quantiles.
    pub fn new(volatility: HistoricalVolatility, config: TierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self { volatility, config })
    }

    /// The active cut configuration.
    pub const fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Classify every non-market ticker in the panel.
    pub fn classify(&self, panel: &PricePanel) -> Result<VolatilityTiers, ClassifierError> {
        self.classify_values(self.volatility.compute_panel(panel))
    }

    /// Classify precomputed `(ticker, volatility)` pairs.
    pub fn classify_values(
        &self,
        values: Vec<(String, Option<f64>)>,
    ) -> Result<VolatilityTiers, ClassifierError> {
        let mut ranked = Vec::with_capacity(values.len());
        let mut unclassified = Vec::new();
        for (ticker, vol) in values {
            match vol {
                Some(volatility) if volatility.is_finite() => {
                    ranked.push(TickerVolatility { ticker, volatility });
                }
                _ => unclassified.push(ticker),
            }
        }

        if ranked.is_empty() {
            return Err(ClassifierError::NothingToClassify {
                unclassified: unclassified.len(),
            });
        }

        ranked.sort_by(|a, b| {
            a.volatility
                .total_cmp(&b.volatility)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        let sorted: Vec<f64> = ranked.iter().map(|m| m.volatility).collect();
        let invalid = ClassifierError::InvalidQuantiles {
            lower: self.config.lower_quantile,
            upper: self.config.upper_quantile,
        };
        let quantile = |q| quantile_sorted(&sorted, q).ok_or_else(|| invalid.clone());
        let cutoffs = TierCutoffs {
            lower: quantile(self.config.lower_quantile)?,
            upper: quantile(self.config.upper_quantile)?,
        };

        let (mut stable, mut middle, mut growth) = (Vec::new(), Vec::new(), Vec::new());
        for member in ranked {
            match cutoffs.tier_for(member.volatility) {
                VolatilityTier::Stable => stable.push(member),
                VolatilityTier::Middle => middle.push(member),
                VolatilityTier::Growth => growth.push(member),
            }
        }

        info!(
            stable = stable.len(),
            middle = middle.len(),
            growth = growth.len(),
            unclassified = unclassified.len(),
            lower = cutoffs.lower,
            upper = cutoffs.upper,
            "volatility tiers computed"
        );

        Ok(VolatilityTiers {
            stable,
            middle,
            growth,
            unclassified,
            cutoffs,
        })
    }
}
