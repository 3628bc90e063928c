//! Text renderings of an analysis result.

use crate::currency::format_currency;
use crate::result::AnalysisResult;

impl AnalysisResult {
    /// Render as an ASCII table for terminals.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPortfolio Analysis: {}\n", self.portfolio_name));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nPerformance:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  Invested:                 {} split across {} stocks\n",
            format_currency(self.metrics.investment_amount),
            self.tickers.len()
        ));
        output.push_str(&format!(
            "  Past Performance:         {}\n",
            self.data.past_performance
        ));
        output.push_str(&format!(
            "  Expected Future Value:    {} ({:.2}% / yr)\n",
            self.data.expected_future_performance,
            self.metrics.expected_return * 100.0
        ));
        output.push_str(&format!(
            "  Portfolio Beta:           {:.4} ({} observations)\n",
            self.data.portfolio_beta, self.metrics.beta_observations
        ));

        output.push_str("\nHoldings:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>12}\n", "Ticker", "Beta"));
        for (ticker, beta) in self.tickers.iter().zip(&self.metrics.betas) {
            output.push_str(&format!("{:<12} {:>12.4}\n", ticker, beta));
        }

        output.push_str("\nNotes:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for text in [
            &self.explanation.past_performance,
            &self.explanation.expected_future_performance,
            &self.explanation.portfolio_beta,
        ] {
            output.push_str(&format!("  * {}\n", text));
        }

        output
    }

    /// Render as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {} Portfolio\n\n", self.portfolio_name));

        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!(
            "| Past Performance | {} |\n",
            self.data.past_performance
        ));
        output.push_str(&format!(
            "| Expected Future Performance | {} |\n",
            self.data.expected_future_performance
        ));
        output.push_str(&format!(
            "| Portfolio Beta | {:.4} |\n\n",
            self.data.portfolio_beta
        ));

        output.push_str("## Holdings\n\n");
        output.push_str("| Ticker | Beta |\n");
        output.push_str("|--------|------|\n");
        for (ticker, beta) in self.tickers.iter().zip(&self.metrics.betas) {
            output.push_str(&format!("| {} | {:.4} |\n", ticker, beta));
        }

        output.push_str("\n## Notes\n\n");
        output.push_str(&format!(
            "- **Past performance.** {}\n",
            self.explanation.past_performance
        ));
        output.push_str(&format!(
            "- **Expected future performance.** {}\n",
            self.explanation.expected_future_performance
        ));
        output.push_str(&format!(
            "- **Portfolio beta.** {}\n",
            self.explanation.portfolio_beta
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use crate::result::tests::sample_result;

    #[test]
    fn test_ascii_table() {
        let ascii = sample_result().to_ascii_table();
        assert!(ascii.contains("Portfolio Analysis: Moderate"));
        assert!(ascii.contains("$1,234.57"));
        assert!(ascii.contains("AAA"));
        assert!(ascii.contains("1.2000"));
    }

    #[test]
    fn test_invested_amount_uses_currency_format() {
        let mut result = sample_result();
        result.metrics.investment_amount = 12_500.0;
        let ascii = result.to_ascii_table();
        assert!(ascii.contains("Invested:                 $12,500.00 split across 2 stocks"));
    }

    #[test]
    fn test_markdown() {
        let markdown = sample_result().to_markdown();
        assert!(markdown.starts_with("# Moderate Portfolio"));
        assert!(markdown.contains("| Past Performance | $1,234.57 |"));
        assert!(markdown.contains("| BBB | 1.2000 |"));
        assert!(markdown.contains("## Notes"));
    }
}
