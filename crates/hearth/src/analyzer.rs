//! Portfolio analysis over a shared price panel.
//!
//! A portfolio is an equal-dollar allocation across the tickers of one tier.
//! The analyzer reports three figures:
//!
//! - past performance: gain or loss of each ticker from its first to its last
//!   observed price, scaled by its allocation and summed
//! - portfolio beta: mean of per-ticker betas against the market index, from
//!   one joint sample covariance matrix
//! - expected future performance: the invested amount compounded at the CAPM
//!   expected return for that beta
//!
//! plus a normalized value series over the rows where every holding trades.

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use hearth_data::PricePanel;
use hearth_factors::{align_trailing, simple_returns};
use hearth_output::{
    AnalysisResult, Assumptions, NormalizedSeries, PerformanceMetrics, SeriesPoint,
};
use hearth_risk::{CapmConfig, portfolio_beta};
use std::sync::Arc;
use tracing::debug;

/// Minimum aligned returns needed for a sample covariance.
const MIN_OBSERVATIONS: usize = 2;

/// Analyzes equal-weight portfolios against one panel.
#[derive(Debug, Clone)]
pub struct PortfolioAnalyzer {
    panel: Arc<PricePanel>,
    capm: CapmConfig,
    investment_amount: f64,
    assumptions: Assumptions,
}

impl PortfolioAnalyzer {
    /// Create an analyzer using the amounts and rates in `config`.
    pub fn new(panel: Arc<PricePanel>, config: &EngineConfig) -> Self {
        let assumptions = Assumptions {
            investment_amount: config.investment_amount,
            history_years: config.window.years(),
            projection_years: config.capm.projection_years,
            risk_free_rate: config.capm.risk_free_rate,
            risk_free_as_of: config.risk_free_as_of,
            market_return: config.capm.market_return,
            benchmark: config.benchmark_name.clone(),
        };
        Self {
            panel,
            capm: config.capm,
            investment_amount: config.investment_amount,
            assumptions,
        }
    }

    /// The panel being analyzed.
    pub fn panel(&self) -> &PricePanel {
        &self.panel
    }

    /// Assumptions quoted in every result.
    pub const fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Analyze a portfolio holding `tickers` in equal dollar amounts.
    pub fn analyze(&self, name: &str, tickers: &[String]) -> Result<AnalysisResult, AnalysisError> {
        if tickers.is_empty() {
            return Err(AnalysisError::EmptyTier {
                portfolio: name.to_string(),
            });
        }
        if let Some(missing) = tickers.iter().find(|t| self.panel.series(t).is_none()) {
            return Err(AnalysisError::UnknownTicker(missing.clone()));
        }

        let allocation = self.investment_amount / tickers.len() as f64;
        let past_performance = self.past_performance(tickers, allocation);
        let normalized_series = self.normalized_series(tickers, allocation);

        let (asset_returns, market_returns) = self.aligned_returns(tickers)?;
        let beta = portfolio_beta(&asset_returns, &market_returns)?;

        let expected_return = self.capm.expected_return(beta.portfolio_beta);
        let expected_future_performance = self
            .capm
            .project(self.investment_amount, beta.portfolio_beta);

        debug!(
            portfolio = name,
            holdings = tickers.len(),
            beta = beta.portfolio_beta,
            observations = beta.observations,
            past_performance,
            expected_future_performance,
            "portfolio analyzed"
        );

        let metrics = PerformanceMetrics {
            investment_amount: self.investment_amount,
            past_performance,
            expected_return,
            expected_future_performance,
            betas: beta.betas,
            beta_observations: beta.observations,
        };

        Ok(AnalysisResult::new(
            name,
            tickers.to_vec(),
            beta.portfolio_beta,
            metrics,
            normalized_series,
            &self.assumptions,
        ))
    }

    fn past_performance(&self, tickers: &[String], allocation: f64) -> f64 {
        tickers
            .iter()
            .filter_map(|t| self.panel.series(t))
            .filter_map(|prices| Some((*prices.first()?, *prices.last()?)))
            .map(|(first, last)| (last - first) / first * allocation)
            .sum()
    }

    /// Portfolio value on every row where all holdings have a price, each
    /// holding rebased to its own first observed price.
    fn normalized_series(&self, tickers: &[String], allocation: f64) -> NormalizedSeries {
        let bases: Vec<f64> = tickers
            .iter()
            .filter_map(|t| self.panel.series(t).and_then(|p| p.first().copied()))
            .collect();

        let points = self
            .panel
            .complete_rows(tickers)
            .into_iter()
            .map(|row| {
                let value = tickers
                    .iter()
                    .zip(&bases)
                    .filter_map(|(t, base)| self.panel.price_at(row, t).map(|p| p / base))
                    .sum::<f64>()
                    * allocation;
                SeriesPoint {
                    date: self.panel.dates()[row],
                    value,
                }
            })
            .collect();

        NormalizedSeries(points)
    }

    /// Returns of each holding over the tier's complete rows, and the
    /// trailing-aligned market returns.
    fn aligned_returns(
        &self,
        tickers: &[String],
    ) -> Result<(Vec<Vec<f64>>, Vec<f64>), AnalysisError> {
        let rows = self.panel.complete_rows(tickers);
        let asset_returns: Vec<Vec<f64>> = tickers
            .iter()
            .map(|t| {
                let prices: Vec<f64> = rows
                    .iter()
                    .filter_map(|&row| self.panel.price_at(row, t))
                    .collect();
                simple_returns(&prices)
            })
            .collect();

        let market_returns = simple_returns(self.panel.market_series());
        let (aligned, _) = align_trailing(
            asset_returns.first().map_or(&[][..], Vec::as_slice),
            &market_returns,
        );
        let observations = aligned.len();
        if observations < MIN_OBSERVATIONS {
            return Err(AnalysisError::InsufficientData {
                observations,
                required: MIN_OBSERVATIONS,
            });
        }

        Ok((asset_returns, market_returns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use hearth_data::PricePoint;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, d).unwrap()
    }

    fn points(prices: &[(u32, f64)]) -> Vec<PricePoint> {
        prices.iter().map(|&(d, p)| PricePoint::new(day(d), p)).collect()
    }

    fn analyzer(amount: f64) -> PortfolioAnalyzer {
        let panel = PricePanel::from_series(
            "SPY",
            points(&[(1, 100.0), (2, 101.0), (3, 103.0)]),
            vec![
                ("AAA".to_string(), points(&[(1, 10.0), (2, 12.0), (3, 15.0)])),
                ("BBB".to_string(), points(&[(1, 20.0), (2, 18.0), (3, 22.0)])),
                ("GAP".to_string(), points(&[(1, 5.0), (3, 6.0)])),
            ],
            Vec::new(),
        )
        .unwrap();
        let config = EngineConfig {
            investment_amount: amount,
            ..EngineConfig::default()
        };
        PortfolioAnalyzer::new(Arc::new(panel), &config)
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_past_performance_uses_equal_allocation() {
        let result = analyzer(100.0).analyze("Moderate", &tickers(&["AAA", "BBB"])).unwrap();
        // 50 * 0.5 + 50 * 0.1
        assert_relative_eq!(result.metrics.past_performance, 30.0, epsilon = 1e-9);
        assert_eq!(result.data.past_performance, "$30.00");
        assert_eq!(result.tickers, tickers(&["AAA", "BBB"]));
        assert_eq!(result.portfolio_name, "Moderate");
    }

    #[test]
    fn test_normalized_series_starts_at_amount() {
        let result = analyzer(100.0).analyze("Moderate", &tickers(&["AAA", "BBB"])).unwrap();
        let values: Vec<f64> = result.normalized_series.points().iter().map(|p| p.value).collect();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 105.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 130.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beta_from_two_observations() {
        let result = analyzer(100.0).analyze("Moderate", &tickers(&["AAA", "BBB"])).unwrap();
        let market = [101.0 / 100.0 - 1.0, 103.0 / 101.0 - 1.0];
        let dm = market[1] - market[0];
        // With two points, beta is the ratio of return changes.
        let beta_aaa = (15.0 / 12.0 - 12.0 / 10.0) / dm;
        let beta_bbb = (22.0 / 18.0 - 18.0 / 20.0) / dm;

        assert_eq!(result.metrics.beta_observations, 2);
        assert_relative_eq!(result.metrics.betas[0], beta_aaa, epsilon = 1e-9);
        assert_relative_eq!(result.metrics.betas[1], beta_bbb, epsilon = 1e-9);
        assert_relative_eq!(
            result.data.portfolio_beta,
            (beta_aaa + beta_bbb) / 2.0,
            epsilon = 1e-9
        );

        let capm = CapmConfig::default();
        assert_relative_eq!(
            result.metrics.expected_future_performance,
            capm.project(100.0, result.data.portfolio_beta),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_market_alone_has_unit_beta() {
        let result = analyzer(100.0).analyze("Market", &tickers(&["SPY"])).unwrap();
        assert_relative_eq!(result.data.portfolio_beta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gap_limits_complete_rows() {
        let analyzer = analyzer(100.0);
        let holdings = tickers(&["AAA", "GAP"]);

        // Each holding runs from its own first to its own last price.
        let past = analyzer.past_performance(&holdings, 50.0);
        assert_relative_eq!(past, 25.0 + 10.0, epsilon = 1e-9);

        let series = analyzer.normalized_series(&holdings, 50.0);
        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, [day(1), day(3)]);
        assert_relative_eq!(series.points()[1].value, (1.5 + 1.2) * 50.0, epsilon = 1e-9);

        let result = analyzer.analyze("Gappy", &holdings).err();
        // Two complete rows leave a single return.
        assert!(matches!(
            result,
            Some(AnalysisError::InsufficientData { observations: 1, required: 2 })
        ));
    }

    #[test]
    fn test_empty_and_unknown_tickers() {
        let analyzer = analyzer(100.0);
        assert!(matches!(
            analyzer.analyze("Aggressive", &[]),
            Err(AnalysisError::EmptyTier { .. })
        ));
        assert!(matches!(
            analyzer.analyze("Aggressive", &tickers(&["AAA", "ZZZ"])),
            Err(AnalysisError::UnknownTicker(t)) if t == "ZZZ"
        ));
    }

    #[test]
    fn test_assumptions_follow_config() {
        let analyzer = analyzer(250.0);
        let assumptions = analyzer.assumptions();
        assert_eq!(assumptions.investment_amount, 250.0);
        assert_eq!(assumptions.history_years, 10);
        assert_eq!(assumptions.benchmark, "S&P 500 (SPY)");
    }
}
