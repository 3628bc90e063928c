//! Analysis result returned to the presentation layer.
//!
//! The result carries display-ready strings (`data`), the fixed explanatory
//! text for each figure (`explanation`), the raw numbers behind them
//! (`metrics`) and the normalized cumulative-value series for charting.
//! Nothing in it depends on wall-clock time, so analyzing the same inputs
//! twice serializes to identical bytes.

use crate::currency::format_currency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point-in-time assumptions quoted in the explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Dollar amount invested.
    pub investment_amount: f64,
    /// Length of the historical window in years.
    pub history_years: u32,
    /// Years the projection compounds over.
    pub projection_years: u32,
    /// Annual risk-free rate.
    pub risk_free_rate: f64,
    /// Date the risk-free rate was observed.
    pub risk_free_as_of: NaiveDate,
    /// Assumed annual market return.
    pub market_return: f64,
    /// Benchmark used for beta.
    pub benchmark: String,
}

/// Display-ready figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    /// Historical gain or loss, formatted as currency.
    pub past_performance: String,
    /// Projected value, formatted as currency.
    pub expected_future_performance: String,
    /// Mean beta of the holdings.
    pub portfolio_beta: f64,
}

/// Explanatory text for each figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Explains `past_performance`.
    pub past_performance: String,
    /// Explains `expected_future_performance`.
    pub expected_future_performance: String,
    /// Explains `portfolio_beta`.
    pub portfolio_beta: String,
}

impl Explanation {
    /// Standard wording for the given assumptions.
    pub fn for_assumptions(a: &Assumptions) -> Self {
        let amount = format_currency(a.investment_amount);
        Self {
            past_performance: format!(
                "The past performance total is the gain or loss if {amount} had been invested \
                 equally among the portfolio stocks {years} years ago. It is computed from \
                 adjusted closing prices. Past performance is not indicative of future results.",
                years = a.history_years,
            ),
            expected_future_performance: format!(
                "The expected future performance total is the projected value of {amount} \
                 invested equally among the portfolio stocks over the next {years} years, based \
                 on the Capital Asset Pricing Model. The risk-free rate of {rf:.2}% is the \
                 10-year Treasury yield as of {as_of}, and the market return is assumed to be \
                 {rm:.2}%. The CAPM expected return is compounded annually over {years} years.",
                years = a.projection_years,
                rf = a.risk_free_rate * 100.0,
                rm = a.market_return * 100.0,
                as_of = a.risk_free_as_of.format("%m/%d/%Y"),
            ),
            portfolio_beta: format!(
                "The portfolio beta is the average beta of the portfolio stocks. Beta measures \
                 volatility relative to the market: a beta of 1 moves with the market, below 1 \
                 is less volatile and above 1 is more volatile. Beta is estimated from {years} \
                 years of daily returns of the portfolio stocks and the {benchmark}.",
                years = a.history_years,
                benchmark = a.benchmark,
            ),
        }
    }
}

/// Raw numbers behind the display figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Dollar amount invested.
    pub investment_amount: f64,
    /// Historical gain or loss in dollars.
    pub past_performance: f64,
    /// CAPM expected annual return.
    pub expected_return: f64,
    /// Projected value in dollars.
    pub expected_future_performance: f64,
    /// Beta of each holding, in ticker order.
    pub betas: Vec<f64>,
    /// Aligned daily return observations used for beta.
    pub beta_observations: usize,
}

/// One point of the normalized cumulative-value series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Portfolio value in dollars.
    pub value: f64,
}

/// Portfolio value over time, starting from the invested amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries(pub Vec<SeriesPoint>);

impl NormalizedSeries {
    /// The points.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    /// Last value, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.0.last().map(|p| p.value)
    }
}

/// Result of analyzing one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Display name, e.g. "Conservative".
    pub portfolio_name: String,
    /// Formatted figures.
    pub data: PerformanceData,
    /// Text explaining each figure.
    pub explanation: Explanation,
    /// Holdings, verbatim from the tier.
    pub tickers: Vec<String>,
    /// Raw figures.
    pub metrics: PerformanceMetrics,
    /// Series for charting.
    pub normalized_series: NormalizedSeries,
}

impl AnalysisResult {
    /// Assemble a result, formatting the figures and attaching explanations.
    pub fn new(
        portfolio_name: impl Into<String>,
        tickers: Vec<String>,
        portfolio_beta: f64,
        metrics: PerformanceMetrics,
        normalized_series: NormalizedSeries,
        assumptions: &Assumptions,
    ) -> Self {
        Self {
            portfolio_name: portfolio_name.into(),
            data: PerformanceData {
                past_performance: format_currency(metrics.past_performance),
                expected_future_performance: format_currency(metrics.expected_future_performance),
                portfolio_beta,
            },
            explanation: Explanation::for_assumptions(assumptions),
            tickers,
            metrics,
            normalized_series,
        }
    }
}
