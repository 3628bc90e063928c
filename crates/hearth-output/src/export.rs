//! JSON and CSV export.

use crate::result::{AnalysisResult, NormalizedSeries};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer produced invalid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension, defaulting to pretty JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::PrettyJson,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<R: Serialize>(records: impl IntoIterator<Item = R>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// One `metric,value` row of a flattened result.
#[derive(Debug, Serialize)]
struct MetricRow<'a> {
    portfolio: &'a str,
    metric: String,
    value: String,
}

impl AnalysisResult {
    fn to_metric_rows(&self) -> Vec<MetricRow<'_>> {
        let row = |metric: &str, value: String| MetricRow {
            portfolio: &self.portfolio_name,
            metric: metric.to_string(),
            value,
        };

        let mut rows = vec![
            row("investment_amount", self.metrics.investment_amount.to_string()),
            row("past_performance", self.metrics.past_performance.to_string()),
            row("expected_return", self.metrics.expected_return.to_string()),
            row(
                "expected_future_performance",
                self.metrics.expected_future_performance.to_string(),
            ),
            row("portfolio_beta", self.data.portfolio_beta.to_string()),
        ];
        for (ticker, beta) in self.tickers.iter().zip(&self.metrics.betas) {
            rows.push(row(&format!("beta_{ticker}"), beta.to_string()));
        }
        rows
    }
}

impl Exporter for AnalysisResult {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.to_metric_rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for NormalizedSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.points()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::tests::sample_result;

    #[test]
    fn test_series_csv() {
        let csv = sample_result()
            .normalized_series
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,value");
        assert_eq!(lines[1], "2023-01-02,100.0");
        assert_eq!(lines[2], "2023-01-03,101.5");
    }

    #[test]
    fn test_result_csv_rows() {
        let csv = sample_result().export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("portfolio,metric,value\n"));
        assert!(csv.contains("Moderate,portfolio_beta,1.1"));
        assert!(csv.contains("Moderate,beta_BBB,1.2"));
    }

    #[test]
    fn test_result_json_round_trip() {
        let result = sample_result();
        let json = result.export_to_string(ExportFormat::PrettyJson).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tickers, result.tickers);
        assert_eq!(parsed.data.past_performance, result.data.past_performance);
        assert_eq!(parsed.explanation, result.explanation);
        assert_eq!(parsed.normalized_series.points().len(), 2);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.CSV")), ExportFormat::Csv);
        assert_eq!(
            ExportFormat::from_path(Path::new("out.json")),
            ExportFormat::PrettyJson
        );
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}
