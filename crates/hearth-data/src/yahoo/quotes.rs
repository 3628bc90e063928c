//! Daily adjusted-close history from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::source::{PricePoint, PriceSource};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider with the default pacing of one request per 250ms.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a provider that sleeps `rate_limit_delay` after every request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    fn to_offset(date: NaiveDate) -> Result<time::OffsetDateTime> {
        let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        time::OffsetDateTime::from_unix_timestamp(timestamp)
            .map_err(|e| DataError::TimeConversion(e.to_string()))
    }
}

#[async_trait]
impl PriceSource for YahooQuoteProvider {
    async fn fetch_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let response = self
            .provider
            .get_quote_history(symbol, Self::to_offset(start)?, Self::to_offset(end)?)
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        sleep(self.rate_limit_delay).await;

        let mut points = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("invalid timestamp {}", quote.timestamp))
                })?
                .date_naive();
            points.push(PricePoint::new(date, quote.adjclose));
        }
        points.sort_by_key(|p| p.date);

        Ok(points)
    }
}
