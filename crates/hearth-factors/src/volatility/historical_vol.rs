//! Historical Volatility
//!
//! Realized volatility of daily returns over the full history of a ticker,
//! annualized with the square root of the trading days per year.

use crate::returns::simple_returns;
use crate::stats::sample_std;
use hearth_data::PricePanel;
use serde::{Deserialize, Serialize};

/// Configuration for historical volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalVolatilityConfig {
    /// Trading days per year used for annualization (default: 252)
    pub trading_days_per_year: u32,
}

impl Default for HistoricalVolatilityConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252,
        }
    }
}

/// Annualized standard deviation of daily returns.
#[derive(Debug, Clone, Default)]
pub struct HistoricalVolatility {
    config: HistoricalVolatilityConfig,
}

impl HistoricalVolatility {
    /// Create with a specific configuration.
    pub const fn with_config(config: HistoricalVolatilityConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &HistoricalVolatilityConfig {
        &self.config
    }

    /// Annualized volatility of a price series.
    ///
    /// `None` when the sample standard deviation of returns is undefined,
    /// i.e. the series has fewer than three prices.
    pub fn annualized(&self, prices: &[f64]) -> Option<f64> {
        let returns = simple_returns(prices);
        let daily = sample_std(&returns)?;
        let annualized = daily * f64::from(self.config.trading_days_per_year).sqrt();
        annualized.is_finite().then_some(annualized)
    }

    /// Volatility of every non-market ticker in the panel, in panel order.
    pub fn compute_panel(&self, panel: &PricePanel) -> Vec<(String, Option<f64>)> {
        panel
            .tickers()
            .iter()
            .map(|ticker| {
                let vol = panel.series(ticker).and_then(|p| self.annualized(p));
                (ticker.clone(), vol)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_defaults() {
        let config = HistoricalVolatilityConfig::default();
        assert_eq!(config.trading_days_per_year, 252);
    }

    #[test]
    fn test_constant_growth_has_zero_volatility() {
        let vol = HistoricalVolatility::default();
        let prices: Vec<f64> = (0..10).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert_relative_eq!(vol.annualized(&prices).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_annualization() {
        // returns: +10%, -10%; sample std = sqrt(0.02) ≈ 0.141421
        let vol = HistoricalVolatility::default();
        let annual = vol.annualized(&[100.0, 110.0, 99.0]).unwrap();
        assert_relative_eq!(annual, 0.02_f64.sqrt() * 252.0_f64.sqrt(), epsilon = 1e-12);

        let custom = HistoricalVolatility::with_config(HistoricalVolatilityConfig {
            trading_days_per_year: 1,
        });
        assert_relative_eq!(
            custom.annualized(&[100.0, 110.0, 99.0]).unwrap(),
            0.02_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_short_series_is_undefined() {
        let vol = HistoricalVolatility::default();
        assert!(vol.annualized(&[]).is_none());
        assert!(vol.annualized(&[100.0]).is_none());
        assert!(vol.annualized(&[100.0, 101.0]).is_none());
    }
}
