//! Household risk profiling.
//!
//! Three respondents each answer five questions with `low`, `medium` or
//! `high`, scored 1, 2 and 3. Anything else scores 1. The household profile
//! comes from the mean respondent total, except that a single respondent
//! whose risk tolerance answer scores 1 forces the conservative profile:
//!
//! - min risk tolerance == 1 or mean <= 8 → conservative
//! - 8 < mean <= 12                      → moderate
//! - mean > 12                           → aggressive

use hearth_factors::VolatilityTier;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Respondents per household.
pub const RESPONDENTS: usize = 3;

/// A categorical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    /// Scores 1.
    Low,
    /// Scores 2.
    Medium,
    /// Scores 3.
    High,
}

impl Answer {
    /// Parse a label, case-insensitively. Unknown labels give `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Numeric score.
    pub const fn score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Score of a possibly missing answer; missing or unrecognized scores 1.
pub const fn score_of(answer: Option<Answer>) -> u8 {
    match answer {
        Some(a) => a.score(),
        None => 1,
    }
}

/// The five questions, in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    /// How long the money can stay invested.
    InvestmentHorizon,
    /// Appetite for risk.
    RiskProfile,
    /// Need for quick access to cash.
    LiquidityNeeds,
    /// Income level.
    IncomeLevel,
    /// Confidence in markets.
    MarketConfidence,
}

impl Question {
    /// All questions in order.
    pub const ALL: [Self; 5] = [
        Self::InvestmentHorizon,
        Self::RiskProfile,
        Self::LiquidityNeeds,
        Self::IncomeLevel,
        Self::MarketConfidence,
    ];

    /// Form field name.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::InvestmentHorizon => "investment_horizon",
            Self::RiskProfile => "risk_profile",
            Self::LiquidityNeeds => "liquidity_needs",
            Self::IncomeLevel => "income_level",
            Self::MarketConfidence => "market_confidence",
        }
    }
}

/// Accept any JSON value; only a recognized label string yields an answer.
fn lenient<'de, D>(deserializer: D) -> Result<Option<Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(Answer::parse))
}

/// One respondent's answers. `None` means missing or unrecognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentAnswer {
    /// Investment horizon.
    #[serde(default, deserialize_with = "lenient")]
    pub investment_horizon: Option<Answer>,
    /// Risk tolerance.
    #[serde(default, deserialize_with = "lenient")]
    pub risk_profile: Option<Answer>,
    /// Liquidity needs.
    #[serde(default, deserialize_with = "lenient")]
    pub liquidity_needs: Option<Answer>,
    /// Income level.
    #[serde(default, deserialize_with = "lenient")]
    pub income_level: Option<Answer>,
    /// Market confidence.
    #[serde(default, deserialize_with = "lenient")]
    pub market_confidence: Option<Answer>,
}

impl RespondentAnswer {
    /// Build from five labels in question order.
    pub fn from_labels(labels: [&str; 5]) -> Self {
        let [horizon, risk, liquidity, income, confidence] = labels.map(Answer::parse);
        Self {
            investment_horizon: horizon,
            risk_profile: risk,
            liquidity_needs: liquidity,
            income_level: income,
            market_confidence: confidence,
        }
    }

    /// Answer to a question.
    pub const fn answer(&self, question: Question) -> Option<Answer> {
        match question {
            Question::InvestmentHorizon => self.investment_horizon,
            Question::RiskProfile => self.risk_profile,
            Question::LiquidityNeeds => self.liquidity_needs,
            Question::IncomeLevel => self.income_level,
            Question::MarketConfidence => self.market_confidence,
        }
    }

    /// Scores in question order.
    pub fn scores(&self) -> [u8; 5] {
        Question::ALL.map(|q| score_of(self.answer(q)))
    }

    /// Sum of the five scores, 5..=15.
    pub fn total(&self) -> u8 {
        self.scores().iter().sum()
    }
}

/// Aggregate scores of a household.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseholdScore {
    /// Per-respondent totals.
    pub totals: [u8; RESPONDENTS],
    /// Mean of the totals.
    pub mean: f64,
    /// Lowest risk tolerance score among respondents.
    pub min_risk_tolerance: u8,
}

/// Exactly three co-deciding respondents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household(pub [RespondentAnswer; RESPONDENTS]);

impl Household {
    /// Create from three respondents.
    pub const fn new(respondents: [RespondentAnswer; RESPONDENTS]) -> Self {
        Self(respondents)
    }

    /// Read answers from form fields named `{question}{n}` with `n` in 1..=3,
    /// e.g. `risk_profile2`. Missing fields score 1.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let respondents = std::array::from_fn(|i| {
            let get = |q: Question| {
                fields
                    .get(&format!("{}{}", q.key(), i + 1))
                    .and_then(|v| Answer::parse(v))
            };
            RespondentAnswer {
                investment_horizon: get(Question::InvestmentHorizon),
                risk_profile: get(Question::RiskProfile),
                liquidity_needs: get(Question::LiquidityNeeds),
                income_level: get(Question::IncomeLevel),
                market_confidence: get(Question::MarketConfidence),
            }
        });
        Self(respondents)
    }

    /// The respondents.
    pub const fn respondents(&self) -> &[RespondentAnswer; RESPONDENTS] {
        &self.0
    }

    /// Totals, mean and minimum risk tolerance.
    pub fn score(&self) -> HouseholdScore {
        let totals = self.0.map(|r| r.total());
        let min_risk_tolerance = self
            .0
            .iter()
            .map(|r| score_of(r.risk_profile))
            .min()
            .unwrap_or(1);
        let sum: u32 = totals.iter().map(|&t| u32::from(t)).sum();
        HouseholdScore {
            totals,
            mean: f64::from(sum) / RESPONDENTS as f64,
            min_risk_tolerance,
        }
    }
}

/// Household risk profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    /// Low risk.
    Conservative,
    /// Medium risk.
    Moderate,
    /// High risk.
    Aggressive,
}

impl RiskProfile {
    /// Lowercase label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// Capitalized label for display.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(format!("unknown risk profile: {s}")),
        }
    }
}

impl From<RiskProfile> for VolatilityTier {
    fn from(profile: RiskProfile) -> Self {
        match profile {
            RiskProfile::Conservative => Self::Stable,
            RiskProfile::Moderate => Self::Middle,
            RiskProfile::Aggressive => Self::Growth,
        }
    }
}

/// Classify a household.
pub fn classify(household: &Household) -> RiskProfile {
    let score = household.score();
    // Compare the sum against 3 × threshold to stay in integers.
    let sum: u32 = score.totals.iter().map(|&t| u32::from(t)).sum();
    let n = RESPONDENTS as u32;

    let profile = if score.min_risk_tolerance == 1 || sum <= 8 * n {
        RiskProfile::Conservative
    } else if sum <= 12 * n {
        RiskProfile::Moderate
    } else {
        RiskProfile::Aggressive
    };

    debug!(
        totals = ?score.totals,
        mean = score.mean,
        min_risk_tolerance = score.min_risk_tolerance,
        profile = %profile,
        "household scored"
    );
    profile
}
