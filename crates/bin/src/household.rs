//! Household answers from the command line.
//!
//! Answers come either as three `--respondent` lists of five labels in
//! question order, or as a JSON object of form fields such as
//! `{"risk_profile1": "high", ...}`.

use hearth_risk::{Household, RespondentAnswer};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Number of labels in one `--respondent` list.
const QUESTIONS: usize = 5;

/// Expand `h`, `m` and `l` to full labels. Anything else passes through and
/// scores as unrecognized.
fn expand(label: &str) -> &str {
    match label.trim() {
        "h" | "H" => "high",
        "m" | "M" => "medium",
        "l" | "L" => "low",
        other => other,
    }
}

/// Parse one comma-separated respondent, e.g. `h,l,m,m,h`.
pub(crate) fn parse_respondent(list: &str) -> Result<RespondentAnswer, String> {
    let labels: Vec<&str> = list.split(',').map(expand).collect();
    let labels: [&str; QUESTIONS] = labels.try_into().map_err(|got: Vec<&str>| {
        format!("expected {QUESTIONS} answers per respondent, got {}", got.len())
    })?;
    Ok(RespondentAnswer::from_labels(labels))
}

/// Build a household from exactly three respondent lists.
pub(crate) fn from_respondents(lists: &[String]) -> Result<Household, String> {
    let respondents = lists
        .iter()
        .map(|l| parse_respondent(l))
        .collect::<Result<Vec<_>, _>>()?;
    let respondents = respondents
        .try_into()
        .map_err(|got: Vec<_>| format!("expected 3 respondents, got {}", got.len()))?;
    Ok(Household::new(respondents))
}

/// Parse a JSON object of form fields. Values that are not strings are
/// dropped, so they score like missing answers.
fn from_form_json(content: &str) -> Result<Household, serde_json::Error> {
    let raw: HashMap<String, Value> = serde_json::from_str(content)?;
    let fields: HashMap<String, String> = raw
        .into_iter()
        .filter_map(|(key, value)| value.as_str().map(|v| (key, v.to_string())))
        .collect();
    Ok(Household::from_form(&fields))
}

/// Read a household from a JSON file of form fields.
pub(crate) fn from_form_file(path: &Path) -> Result<Household, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(from_form_json(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_risk::{Answer, RiskProfile, classify};
    use rstest::rstest;

    #[test]
    fn test_short_labels_expand() {
        let answer = parse_respondent("h,l,M,medium,x").unwrap();
        assert_eq!(answer.investment_horizon, Some(Answer::High));
        assert_eq!(answer.risk_profile, Some(Answer::Low));
        assert_eq!(answer.liquidity_needs, Some(Answer::Medium));
        assert_eq!(answer.income_level, Some(Answer::Medium));
        assert_eq!(answer.market_confidence, None);
    }

    #[rstest]
    #[case("h,h,h,h")]
    #[case("h,h,h,h,h,h")]
    fn test_wrong_answer_count(#[case] list: &str) {
        assert!(parse_respondent(list).is_err());
    }

    #[test]
    fn test_three_respondents_required() {
        let lists = vec!["h,h,h,h,h".to_string(), "h,h,h,h,h".to_string()];
        assert!(from_respondents(&lists).is_err());

        let lists = vec!["h,h,h,h,h".to_string(); 3];
        let household = from_respondents(&lists).unwrap();
        assert_eq!(classify(&household), RiskProfile::Aggressive);
    }

    #[test]
    fn test_form_with_non_string_values() {
        let json = r#"{
            "investment_horizon1": "high", "risk_profile1": "high",
            "liquidity_needs1": 3, "income_level1": null, "market_confidence1": {},
            "risk_profile2": "medium",
            "risk_profile3": "medium", "income_level3": "high"
        }"#;
        let household = from_form_json(json).unwrap();
        assert_eq!(household.respondents()[0].scores(), [3, 3, 1, 1, 1]);
        assert_eq!(household.score().totals, [9, 6, 8]);
        assert_eq!(classify(&household), RiskProfile::Conservative);
    }

    #[test]
    fn test_form_must_be_an_object() {
        assert!(from_form_json(r#"["high"]"#).is_err());
    }
}
