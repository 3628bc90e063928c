#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hearth-quant/hearth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod currency;
pub mod export;
pub mod report;
pub mod result;

pub use currency::format_currency;
pub use export::{ExportError, ExportFormat, Exporter};
pub use result::{
    AnalysisResult, Assumptions, Explanation, NormalizedSeries, PerformanceData,
    PerformanceMetrics, SeriesPoint,
};
