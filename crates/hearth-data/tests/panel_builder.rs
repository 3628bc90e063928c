//! Integration tests for building a price panel from a price source.

use async_trait::async_trait;
use chrono::NaiveDate;
use hearth_data::{DataError, PanelBuilder, PricePoint, PriceSource, StaticPriceSource};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
}

fn builder() -> PanelBuilder {
    PanelBuilder::new(day(1), day(31), "SPY").with_retries(1, Duration::ZERO)
}

fn universe(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_failed_ticker_is_excluded() {
    let source = StaticPriceSource::new()
        .with_prices("SPY", day(1), &[100.0, 101.0, 99.0])
        .with_prices("AAA", day(1), &[10.0, 11.0, 12.0])
        .with_failure("BAD");

    let panel = builder()
        .build(&source, &universe(&["AAA", "BAD", "EMPTY"]))
        .await
        .unwrap();

    assert_eq!(panel.tickers(), ["AAA"]);
    assert_eq!(panel.unavailable(), ["BAD", "EMPTY"]);
    assert_eq!(panel.market_ticker(), "SPY");
}

#[tokio::test]
async fn test_missing_market_fails_fast() {
    let source = StaticPriceSource::new()
        .with_prices("AAA", day(1), &[10.0, 11.0])
        .with_failure("SPY");

    let result = builder().build(&source, &universe(&["AAA"])).await;
    assert!(matches!(
        result,
        Err(DataError::MarketIndexUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_all_tickers_missing_is_error() {
    let source = StaticPriceSource::new().with_prices("SPY", day(1), &[100.0, 101.0]);

    let result = builder().build(&source, &universe(&["X", "Y"])).await;
    assert!(matches!(result, Err(DataError::EmptyUniverse { requested: 2 })));
}

#[tokio::test]
async fn test_duplicates_and_market_in_universe_are_skipped() {
    let source = StaticPriceSource::new()
        .with_prices("SPY", day(1), &[100.0, 101.0])
        .with_prices("AAA", day(1), &[1.0, 2.0])
        .with_prices("BBB", day(1), &[3.0, 4.0]);

    let panel = builder()
        .build(&source, &universe(&["BBB", "AAA", "SPY", "BBB"]))
        .await
        .unwrap();

    assert_eq!(panel.tickers(), ["BBB", "AAA"]);
}

#[tokio::test]
async fn test_inverted_window_is_rejected() {
    let source = StaticPriceSource::new();
    let result = PanelBuilder::new(day(10), day(1), "SPY")
        .build(&source, &universe(&["AAA"]))
        .await;
    assert!(matches!(result, Err(DataError::InvalidDateRange { .. })));
}

#[tokio::test]
async fn test_progress_reports_every_ticker() {
    let source = StaticPriceSource::new()
        .with_prices("SPY", day(1), &[100.0, 101.0])
        .with_prices("AAA", day(1), &[1.0, 2.0])
        .with_failure("BAD");

    let seen = std::sync::Mutex::new(Vec::new());
    builder()
        .build_with_progress(&source, &universe(&["AAA", "BAD"]), |symbol, ok| {
            seen.lock().unwrap().push((symbol.to_string(), ok));
        })
        .await
        .unwrap();

    assert_eq!(
        seen.into_inner().unwrap(),
        vec![("AAA".to_string(), true), ("BAD".to_string(), false)]
    );
}

/// Fails a fixed number of times before delegating.
struct FlakySource {
    inner: StaticPriceSource,
    failures_left: AtomicU32,
}

#[async_trait]
impl PriceSource for FlakySource {
    async fn fetch_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> hearth_data::Result<Vec<PricePoint>> {
        if symbol == "AAA" && self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(DataError::YahooApi("transient".to_string()));
        }
        self.inner.fetch_daily_prices(symbol, start, end).await
    }
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let source = FlakySource {
        inner: StaticPriceSource::new()
            .with_prices("SPY", day(1), &[100.0, 101.0])
            .with_prices("AAA", day(1), &[1.0, 2.0]),
        failures_left: AtomicU32::new(1),
    };

    let panel = builder().build(&source, &universe(&["AAA"])).await.unwrap();
    assert_eq!(panel.tickers(), ["AAA"]);
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let source = FlakySource {
        inner: StaticPriceSource::new()
            .with_prices("SPY", day(1), &[100.0, 101.0])
            .with_prices("AAA", day(1), &[1.0, 2.0])
            .with_prices("BBB", day(1), &[1.0, 2.0]),
        failures_left: AtomicU32::new(5),
    };

    let panel = builder()
        .build(&source, &universe(&["AAA", "BBB"]))
        .await
        .unwrap();
    assert_eq!(panel.tickers(), ["BBB"]);
    assert_eq!(panel.unavailable(), ["AAA"]);
}
