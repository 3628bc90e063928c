//! Date-aligned price panel.
//!
//! Every ticker is cleaned on its own before the outer join, so a sparse
//! ticker only shortens its own series. The panel itself is the union of all
//! trading dates, with holes where a ticker has no observation. Consumers that
//! need joint observations ask for [`PricePanel::complete_rows`].

use crate::error::{DataError, Result};
use crate::source::{PricePoint, PriceSource};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of concurrent fetches.
pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
struct TickerColumn {
    /// One cell per panel row.
    cells: Vec<Option<f64>>,
    /// Observed prices in date order.
    prices: Vec<f64>,
    /// Dates of `prices`.
    dates: Vec<NaiveDate>,
}

/// Immutable table of adjusted closes keyed by trading date.
#[derive(Debug, Clone)]
pub struct PricePanel {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    market_ticker: String,
    columns: HashMap<String, TickerColumn>,
    unavailable: Vec<String>,
}

impl PricePanel {
    /// Assemble a panel from already-fetched series.
    ///
    /// Each series is cleaned (invalid prices dropped, sorted, one point per
    /// date) before joining. Tickers whose cleaned series is empty are moved to
    /// the unavailable list. The market series must survive cleaning.
    pub fn from_series(
        market_ticker: impl Into<String>,
        market: Vec<PricePoint>,
        series: Vec<(String, Vec<PricePoint>)>,
        unavailable: Vec<String>,
    ) -> Result<Self> {
        let market_ticker = market_ticker.into();
        let market = clean_series(market);
        if market.is_empty() {
            return Err(DataError::MarketIndexUnavailable {
                symbol: market_ticker,
                reason: "no valid observations in window".to_string(),
            });
        }

        let mut unavailable = unavailable;
        let mut kept: Vec<(String, Vec<PricePoint>)> = Vec::with_capacity(series.len());
        let mut seen = HashSet::new();
        for (ticker, points) in series {
            if ticker == market_ticker || !seen.insert(ticker.clone()) {
                continue;
            }
            let cleaned = clean_series(points);
            if cleaned.is_empty() {
                unavailable.push(ticker);
            } else {
                kept.push((ticker, cleaned));
            }
        }

        let dates: Vec<NaiveDate> = market
            .iter()
            .chain(kept.iter().flat_map(|(_, points)| points.iter()))
            .map(|p| p.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_of: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let to_column = |points: &[PricePoint]| {
            let mut cells = vec![None; dates.len()];
            for p in points {
                cells[row_of[&p.date]] = Some(p.adjusted_close);
            }
            TickerColumn {
                cells,
                prices: points.iter().map(|p| p.adjusted_close).collect(),
                dates: points.iter().map(|p| p.date).collect(),
            }
        };

        let mut columns = HashMap::with_capacity(kept.len() + 1);
        columns.insert(market_ticker.clone(), to_column(&market));
        let mut tickers = Vec::with_capacity(kept.len());
        for (ticker, points) in &kept {
            columns.insert(ticker.clone(), to_column(points));
            tickers.push(ticker.clone());
        }

        Ok(Self {
            dates,
            tickers,
            market_ticker,
            columns,
            unavailable,
        })
    }

    /// All trading dates present in any column.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no rows.
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Non-market tickers with data, in universe order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// The market index ticker.
    pub fn market_ticker(&self) -> &str {
        &self.market_ticker
    }

    /// Tickers that were requested but produced no usable data.
    pub fn unavailable(&self) -> &[String] {
        &self.unavailable
    }

    /// Whether `ticker` has a column (the market index included).
    pub fn contains(&self, ticker: &str) -> bool {
        self.columns.contains_key(ticker)
    }

    /// A ticker's observed prices in date order.
    pub fn series(&self, ticker: &str) -> Option<&[f64]> {
        self.columns.get(ticker).map(|c| c.prices.as_slice())
    }

    /// Dates matching [`Self::series`].
    pub fn dates_of(&self, ticker: &str) -> Option<&[NaiveDate]> {
        self.columns.get(ticker).map(|c| c.dates.as_slice())
    }

    /// The market index's observed prices in date order.
    pub fn market_series(&self) -> &[f64] {
        self.series(&self.market_ticker).unwrap_or_default()
    }

    /// Price of `ticker` at panel row `row`, if present.
    pub fn price_at(&self, row: usize, ticker: &str) -> Option<f64> {
        self.columns
            .get(ticker)
            .and_then(|c| c.cells.get(row).copied().flatten())
    }

    /// Price of `ticker` on `date`, if present.
    pub fn price_on(&self, date: NaiveDate, ticker: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.price_at(row, ticker)
    }

    /// Rows where every ticker in `tickers` has a price.
    ///
    /// An unknown ticker makes every row incomplete.
    pub fn complete_rows<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<usize> {
        let Some(columns) = tickers
            .iter()
            .map(|t| self.columns.get(t.as_ref()))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };

        (0..self.dates.len())
            .filter(|&row| columns.iter().all(|c| c.cells[row].is_some()))
            .collect()
    }

    /// Wide polars frame: a `date` column followed by one nullable column per
    /// ticker, market index last.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.tickers.len() + 2);
        columns.push(Series::new("date".into(), self.dates.clone()).into());
        for ticker in self.tickers.iter().chain(std::iter::once(&self.market_ticker)) {
            let cells = self.columns[ticker].cells.clone();
            columns.push(Series::new(ticker.as_str().into(), cells).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Drop unusable observations, sort by date and keep the first point per date.
fn clean_series(points: Vec<PricePoint>) -> Vec<PricePoint> {
    let mut cleaned: Vec<PricePoint> = points.into_iter().filter(PricePoint::is_valid).collect();
    cleaned.sort_by_key(|p| p.date);
    cleaned.dedup_by_key(|p| p.date);
    cleaned
}

/// Fetches a universe plus market index and assembles a [`PricePanel`].
#[derive(Debug, Clone)]
pub struct PanelBuilder {
    start: NaiveDate,
    end: NaiveDate,
    market_ticker: String,
    concurrency: usize,
    max_retries: u32,
    retry_delay: Duration,
}

impl PanelBuilder {
    /// Create a builder for the window `[start, end)`.
    pub fn new(start: NaiveDate, end: NaiveDate, market_ticker: impl Into<String>) -> Self {
        Self {
            start,
            end,
            market_ticker: market_ticker.into(),
            concurrency: DEFAULT_CONCURRENCY,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Set the number of in-flight requests.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the retry budget per ticker.
    pub const fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch everything and build the panel.
    pub async fn build<S>(&self, source: &S, universe: &[String]) -> Result<PricePanel>
    where
        S: PriceSource + ?Sized,
    {
        self.build_with_progress(source, universe, |_, _| {}).await
    }

    /// Like [`Self::build`], calling `progress` once per universe ticker with
    /// the ticker and whether it produced data.
    pub async fn build_with_progress<S, F>(
        &self,
        source: &S,
        universe: &[String],
        progress: F,
    ) -> Result<PricePanel>
    where
        S: PriceSource + ?Sized,
        F: Fn(&str, bool),
    {
        if self.start >= self.end {
            return Err(DataError::InvalidDateRange {
                start: self.start.to_string(),
                end: self.end.to_string(),
            });
        }

        let market = self
            .fetch_with_retry(source, &self.market_ticker)
            .await
            .map_err(|e| DataError::MarketIndexUnavailable {
                symbol: self.market_ticker.clone(),
                reason: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        let symbols: Vec<&String> = universe
            .iter()
            .filter(|s| **s != self.market_ticker && seen.insert(s.as_str()))
            .collect();
        info!(
            tickers = symbols.len(),
            market = %self.market_ticker,
            start = %self.start,
            end = %self.end,
            "fetching price history"
        );

        // `buffered` keeps results in universe order so the panel is deterministic.
        let results: Vec<(String, Result<Vec<PricePoint>>)> = stream::iter(symbols)
            .map(|symbol| async move {
                let result = self.fetch_with_retry(source, symbol).await;
                (symbol.clone(), result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut series = Vec::with_capacity(results.len());
        let mut unavailable = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(points) if points.iter().any(PricePoint::is_valid) => {
                    progress(&symbol, true);
                    series.push((symbol, points));
                }
                Ok(_) => {
                    warn!(%symbol, "no usable prices in window, excluding");
                    progress(&symbol, false);
                    unavailable.push(symbol);
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "price retrieval failed, excluding");
                    progress(&symbol, false);
                    unavailable.push(symbol);
                }
            }
        }

        if series.is_empty() {
            return Err(DataError::EmptyUniverse {
                requested: unavailable.len(),
            });
        }

        let panel = PricePanel::from_series(self.market_ticker.clone(), market, series, unavailable)?;
        info!(
            rows = panel.len(),
            tickers = panel.tickers().len(),
            unavailable = panel.unavailable().len(),
            "price panel ready"
        );
        Ok(panel)
    }

    async fn fetch_with_retry<S>(&self, source: &S, symbol: &str) -> Result<Vec<PricePoint>>
    where
        S: PriceSource + ?Sized,
    {
        let mut attempt = 0;
        loop {
            match source.fetch_daily_prices(symbol, self.start, self.end).await {
                Ok(points) => return Ok(points),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    debug!(%symbol, attempt, error = %e, "retrying price fetch");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn points(start: u32, prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(day(start + i as u32), p))
            .collect()
    }

    #[test]
    fn test_outer_join_keeps_holes() {
        let panel = PricePanel::from_series(
            "SPY",
            points(1, &[100.0, 101.0, 102.0, 103.0]),
            vec![
                ("AAA".to_string(), points(1, &[10.0, 11.0, 12.0, 13.0])),
                ("BBB".to_string(), points(3, &[5.0, 6.0])),
            ],
            vec![],
        )
        .unwrap();

        assert_eq!(panel.len(), 4);
        assert_eq!(panel.tickers(), ["AAA", "BBB"]);
        assert_eq!(panel.series("BBB").unwrap(), [5.0, 6.0]);
        assert_eq!(panel.price_at(0, "BBB"), None);
        assert_eq!(panel.price_on(day(4), "BBB"), Some(6.0));
        assert_eq!(panel.complete_rows(&["AAA", "BBB"]), vec![2, 3]);
        assert_eq!(panel.complete_rows(&["AAA"]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cleaning_drops_invalid_and_duplicates() {
        let mut raw = points(1, &[10.0, f64::NAN, 12.0, 0.0]);
        raw.push(PricePoint::new(day(1), 99.0));
        raw.reverse();
        let panel = PricePanel::from_series(
            "SPY",
            points(1, &[1.0, 1.0, 1.0, 1.0]),
            vec![("AAA".to_string(), raw)],
            vec![],
        )
        .unwrap();

        assert_eq!(panel.series("AAA").unwrap().len(), 2);
        assert_eq!(panel.dates_of("AAA").unwrap(), [day(1), day(3)]);
    }

    #[test]
    fn test_empty_series_becomes_unavailable() {
        let panel = PricePanel::from_series(
            "SPY",
            points(1, &[1.0, 2.0]),
            vec![
                ("AAA".to_string(), points(1, &[1.0, 2.0])),
                ("NIL".to_string(), vec![]),
            ],
            vec!["GONE".to_string()],
        )
        .unwrap();

        assert_eq!(panel.tickers(), ["AAA"]);
        assert_eq!(panel.unavailable(), ["GONE", "NIL"]);
        assert!(!panel.contains("NIL"));
    }

    #[test]
    fn test_missing_market_is_error() {
        let result = PricePanel::from_series("SPY", vec![], vec![], vec![]);
        assert!(matches!(
            result,
            Err(DataError::MarketIndexUnavailable { .. })
        ));
    }

    #[test]
    fn test_unknown_ticker_has_no_complete_rows() {
        let panel =
            PricePanel::from_series("SPY", points(1, &[1.0, 2.0]), vec![], vec![]).unwrap();
        assert!(panel.complete_rows(&["NOPE"]).is_empty());
        assert_eq!(panel.market_series(), [1.0, 2.0]);
    }

    #[test]
    fn test_to_frame_shape() {
        let panel = PricePanel::from_series(
            "SPY",
            points(1, &[100.0, 101.0, 102.0]),
            vec![("AAA".to_string(), points(2, &[10.0, 11.0]))],
            vec![],
        )
        .unwrap();

        let df = panel.to_frame().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names(), vec!["date", "AAA", "SPY"]);
        assert_eq!(df.column("AAA").unwrap().null_count(), 1);
    }
}
