//! Default large-cap universe.

use super::StaticUniverse;

/// US large caps classified by the engine, deduplicated.
pub const LARGE_CAP_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "JPM", "AMZN", "GOOGL", "BAC", "WMT", "V", "MA", "PG",
    "UNH", "T", "INTC", "VZ", "CSCO", "XOM", "KO", "CVX", "PFE", "HD",
    "MCD", "MRK", "DIS", "WFC", "CMCSA", "PEP", "ORCL", "C", "BA", "MMM",
    "ABBV", "AMGN", "CAT", "DHR", "MDLZ", "NKE", "UPS", "QCOM", "GILD", "AXP",
    "USB", "TMO", "GS", "LLY", "HON", "MO", "GM", "F", "IBM", "GE",
    "AIG", "ALL", "ADP", "BMY", "COP", "DUK", "KHC", "LMT", "NOC", "RTX",
    "SBUX", "SO", "TGT", "TXN", "CVS", "SYK", "DE", "HUM", "INTU", "LOW",
    "MET", "MS", "PRU", "WBA", "AMT", "CHTR", "CL", "D", "FIS", "ITW",
    "OXY", "PNC", "TFC", "BKNG", "CB", "CI", "ECL", "ACN", "MMC", "PLD",
    "SRE", "TJX", "TROW", "UHS", "VFC", "WELL", "ZTS", "ADI", "BLK", "ADSK",
    "CME", "COF", "COST", "DAL", "EBAY", "EL", "EXC", "FDX", "GD", "GLW",
    "HPE", "HPQ", "JNJ", "KMI", "KMX", "LUV", "MCK", "MDT", "MSI", "NEE",
    "NFLX", "NSC", "NVDA", "PGR", "PM", "PYPL", "SLB", "SPGI", "SYY", "TRV",
    "TSLA", "UNP",
];

/// Default market index.
pub const DEFAULT_MARKET_INDEX: &str = "SPY";

impl StaticUniverse {
    /// The default large-cap universe.
    pub fn large_cap() -> Self {
        Self::from_symbols(LARGE_CAP_SYMBOLS.iter().copied())
    }
}
