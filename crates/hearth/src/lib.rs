#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hearth-quant/hearth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod universe;

// Re-export main types from sub-crates
pub use hearth_data as data;
pub use hearth_factors as factors;
pub use hearth_output as output;
pub use hearth_risk as risk;

pub use analyzer::PortfolioAnalyzer;
pub use config::{ConfigError, EngineConfig, FetchConfig, WindowConfig};
pub use engine::{Engine, portfolio_name, resolve_label};
pub use error::{AnalysisError, EngineError, Result};
pub use universe::{StaticUniverse, Universe};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
