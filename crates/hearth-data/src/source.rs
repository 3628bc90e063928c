//! Price source abstraction.
//!
//! The engine only needs ordered adjusted-close observations per ticker, so
//! the network provider and the in-memory fixture share one small trait.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One daily observation of a ticker's adjusted close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Close price adjusted for splits and dividends.
    pub adjusted_close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }

    /// Whether the observation carries a usable price.
    pub fn is_valid(&self) -> bool {
        self.adjusted_close.is_finite() && self.adjusted_close > 0.0
    }
}

/// A provider of daily price history.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily adjusted closes for `symbol` in `[start, end)`, ordered by date.
    async fn fetch_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>>;
}

/// In-memory price source, used for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, Vec<PricePoint>>,
    failing: HashSet<String>,
}

impl StaticPriceSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full series for a symbol.
    pub fn with_series(mut self, symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        self.series.insert(symbol.into(), points);
        self
    }

    /// Register prices on consecutive calendar days starting at `start`.
    pub fn with_prices(self, symbol: impl Into<String>, start: NaiveDate, prices: &[f64]) -> Self {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + Duration::days(i as i64), p))
            .collect();
        self.with_series(symbol, points)
    }

    /// Make every request for `symbol` fail.
    pub fn with_failure(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if self.failing.contains(symbol) {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "simulated retrieval failure".to_string(),
            });
        }

        let points = self
            .series
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date < end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        Ok(points)
    }
}
