//! Ticker universes.
//!
//! A universe is the fixed set of tickers the volatility classifier splits
//! into tiers. The market index is kept separately and never classified.

pub mod large_cap;

pub use large_cap::{DEFAULT_MARKET_INDEX, LARGE_CAP_SYMBOLS};

use std::collections::HashSet;

/// Trait for stock universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().iter().any(|s| s == symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

/// A fixed list of symbols, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    /// Build from symbols, trimming, uppercasing and dropping duplicates.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }
}

impl Universe for StaticUniverse {
    fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }

    fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    fn size(&self) -> usize {
        self.symbols.len()
    }
}
