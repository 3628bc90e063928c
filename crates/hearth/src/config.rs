//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides:
//!
//! ```json
//! { "investment_amount": 1000.0, "capm": { "risk_free_rate": 0.04 } }
//! ```

use crate::universe::DEFAULT_MARKET_INDEX;
use chrono::NaiveDate;
use hearth_factors::{ClassifierError, HistoricalVolatilityConfig, TierConfig};
use hearth_risk::CapmConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid tier quantiles
    #[error(transparent)]
    Tiers(#[from] ClassifierError),

    /// Any other invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Historical window for price retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// First date, inclusive (default: 2013-11-10)
    pub start: NaiveDate,
    /// Last date, exclusive (default: 2023-11-10)
    pub end: NaiveDate,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2013, 11, 10).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 11, 10).unwrap_or_default(),
        }
    }
}

impl WindowConfig {
    /// Window length in whole years, rounded.
    pub fn years(&self) -> u32 {
        let days = (self.end - self.start).num_days().max(0);
        (days as f64 / 365.25).round() as u32
    }
}

/// Price retrieval behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Requests in flight (default: 10)
    pub concurrency: usize,
    /// Retries per ticker after the first attempt (default: 2)
    pub max_retries: u32,
    /// Pause between retries in milliseconds (default: 500)
    pub retry_delay_ms: u64,
    /// Pause after each request in milliseconds (default: 250)
    pub rate_limit_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: hearth_data::panel::DEFAULT_CONCURRENCY,
            max_retries: 2,
            retry_delay_ms: 500,
            rate_limit_ms: 250,
        }
    }
}

impl FetchConfig {
    /// Retry pause as a duration.
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Request pacing as a duration.
    pub const fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tickers to classify; `None` uses the default large-cap list.
    pub universe: Option<Vec<String>>,
    /// Market index ticker (default: SPY)
    pub market_ticker: String,
    /// Display name of the benchmark in explanations.
    pub benchmark_name: String,
    /// Historical window.
    pub window: WindowConfig,
    /// Dollars split equally across a portfolio (default: 100)
    pub investment_amount: f64,
    /// CAPM assumptions.
    pub capm: CapmConfig,
    /// Date the risk-free rate was observed.
    pub risk_free_as_of: NaiveDate,
    /// Volatility annualization.
    pub volatility: HistoricalVolatilityConfig,
    /// Tier quantiles.
    pub tiers: TierConfig,
    /// Retrieval behaviour.
    pub fetch: FetchConfig,
    /// Upper bound on a single analysis in milliseconds, if any.
    pub analysis_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            universe: None,
            market_ticker: DEFAULT_MARKET_INDEX.to_string(),
            benchmark_name: "S&P 500 (SPY)".to_string(),
            window: WindowConfig::default(),
            investment_amount: 100.0,
            capm: CapmConfig::default(),
            risk_free_as_of: NaiveDate::from_ymd_opt(2023, 11, 10).unwrap_or_default(),
            volatility: HistoricalVolatilityConfig::default(),
            tiers: TierConfig::default(),
            fetch: FetchConfig::default(),
            analysis_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tiers.validate()?;

        if self.window.start >= self.window.end {
            return Err(ConfigError::Invalid(format!(
                "window start {} must be before end {}",
                self.window.start, self.window.end
            )));
        }
        if !(self.investment_amount.is_finite() && self.investment_amount > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "investment amount must be positive, got {}",
                self.investment_amount
            )));
        }
        if self.market_ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("market ticker is empty".to_string()));
        }
        if self.volatility.trading_days_per_year == 0 {
            return Err(ConfigError::Invalid(
                "trading days per year must be positive".to_string(),
            ));
        }
        if let Some(universe) = &self.universe
            && universe.iter().all(|s| s.trim().is_empty())
        {
            return Err(ConfigError::Invalid("universe is empty".to_string()));
        }
        Ok(())
    }

    /// Analysis timeout as a duration.
    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.market_ticker, "SPY");
        assert_eq!(config.investment_amount, 100.0);
        assert_eq!(config.window.years(), 10);
        assert_eq!(config.capm.projection_years, 10);
        assert_eq!(config.volatility.trading_days_per_year, 252);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{
            "investment_amount": 1000.0,
            "capm": { "risk_free_rate": 0.04, "market_return": 0.09, "projection_years": 5 },
            "fetch": { "concurrency": 3 }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.investment_amount, 1000.0);
        assert_eq!(config.capm.projection_years, 5);
        assert_eq!(config.fetch.concurrency, 3);
        assert_eq!(config.fetch.max_retries, 2);
        assert_eq!(config.market_ticker, "SPY");
    }

    #[test]
    fn test_nested_sections_accept_single_fields() {
        let json = r#"{ "investment_amount": 1000.0, "capm": { "risk_free_rate": 0.04 } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.capm.risk_free_rate, 0.04);
        assert_eq!(config.capm.market_return, 0.0961);
        assert_eq!(config.capm.projection_years, 10);

        let json = r#"{
            "window": { "start": "2015-01-01" },
            "volatility": {},
            "tiers": { "upper_quantile": 0.7 }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window.start, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(config.window.end, WindowConfig::default().end);
        assert_eq!(config.volatility.trading_days_per_year, 252);
        assert_eq!(config.tiers.lower_quantile, 0.33);
        assert_eq!(config.tiers.upper_quantile, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.investment_amount = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.window.end = config.window.start;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.tiers.lower_quantile = 0.8;
        assert!(matches!(config.validate(), Err(ConfigError::Tiers(_))));

        let mut config = EngineConfig::default();
        config.universe = Some(vec![" ".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = EngineConfig::load_or_default(Path::new("/nonexistent/hearth.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
