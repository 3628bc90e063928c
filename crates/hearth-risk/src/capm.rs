//! Capital Asset Pricing Model projection.
//!
//! E[R] = r_f + β (E[R_m] - r_f)
//!
//! The expected return is compounded annually over the projection horizon.
//! Rates are point-in-time assumptions, not live market data.

use serde::{Deserialize, Serialize};

/// CAPM assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapmConfig {
    /// Annual risk-free rate (default: 0.0461, 10-year Treasury yield on 2023-11-10)
    pub risk_free_rate: f64,
    /// Assumed annual market return (default: 0.0961)
    pub market_return: f64,
    /// Years to compound over (default: 10)
    pub projection_years: u32,
}

impl Default for CapmConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0461,
            market_return: 0.0961,
            projection_years: 10,
        }
    }
}

impl CapmConfig {
    /// Market risk premium `E[R_m] - r_f`.
    pub fn market_premium(&self) -> f64 {
        self.market_return - self.risk_free_rate
    }

    /// Expected annual return for a given beta.
    pub fn expected_return(&self, beta: f64) -> f64 {
        self.risk_free_rate + beta * self.market_premium()
    }

    /// Value of `amount` after compounding the expected return.
    pub fn project(&self, amount: f64, beta: f64) -> f64 {
        amount * (1.0 + self.expected_return(beta)).powf(f64::from(self.projection_years))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = CapmConfig::default();
        assert_eq!(config.risk_free_rate, 0.0461);
        assert_eq!(config.market_return, 0.0961);
        assert_eq!(config.projection_years, 10);
        assert_relative_eq!(config.market_premium(), 0.05, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0, 0.0461)]
    #[case(1.0, 0.0961)]
    #[case(2.0, 0.1461)]
    #[case(-0.5, 0.0211)]
    fn test_expected_return(#[case] beta: f64, #[case] expected: f64) {
        let config = CapmConfig::default();
        assert_relative_eq!(config.expected_return(beta), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_compounds() {
        let config = CapmConfig::default();
        assert_relative_eq!(
            config.project(100.0, 1.0),
            100.0 * 1.0961_f64.powi(10),
            epsilon = 1e-9
        );
        assert_relative_eq!(config.project(100.0, 1.0), 250.32, epsilon = 0.01);

        let one_year = CapmConfig {
            projection_years: 1,
            ..CapmConfig::default()
        };
        assert_relative_eq!(one_year.project(200.0, 0.0), 209.22, epsilon = 1e-9);
    }
}
