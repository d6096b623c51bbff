//! Results file parsing

use crate::error::{CliError, Result};
use oox_domain::{CategoryCode, HealthStatus, HealthTally, Match, Tier};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultsFile {
    Matches(Vec<MatchEntry>),
    Session {
        matches: Vec<MatchEntry>,
        #[serde(default)]
        health_answers: Vec<HealthAnswer>,
    },
}

#[derive(Debug, Deserialize)]
struct MatchEntry {
    winner: String,
    loser: String,
    #[serde(default)]
    id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct HealthAnswer {
    target: String,
    value: u8,
}

/// Matches and health answers from one quiz session
#[derive(Debug, Clone, Default)]
pub struct QuizResults {
    /// Pairwise results in file order
    pub matches: Vec<Match>,
    /// Health answers per code
    pub health: HealthTally,
}

impl QuizResults {
    /// Parse a results document
    ///
    /// Accepts a bare JSON array of matches or an object with `matches` and
    /// optional `health_answers`.
    pub fn parse(json: &str) -> Result<Self> {
        let (entries, answers) = match serde_json::from_str::<ResultsFile>(json)? {
            ResultsFile::Matches(entries) => (entries, Vec::new()),
            ResultsFile::Session {
                matches,
                health_answers,
            } => (matches, health_answers),
        };

        let matches = entries
            .into_iter()
            .map(|entry| Match::answer(&entry.winner, &entry.loser, source_id(entry.id)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(CliError::InvalidInput)?;

        let mut health = HealthTally::new();
        for answer in answers {
            health
                .record_answer(&answer.target, answer.value)
                .map_err(CliError::InvalidInput)?;
        }

        Ok(Self { matches, health })
    }

    /// Read and parse a results file
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Health status for the eight function codes and every other code seen
    pub fn health_statuses(&self) -> Vec<(CategoryCode, HealthStatus)> {
        self.health.report(&self.matches)
    }
}

/// Question ids may be strings or numbers; strings are taken verbatim
fn source_id(id: Option<serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::Null => None,
        serde_json::Value::String(id) => Some(id),
        other => Some(other.to_string()),
    }
}

/// Parse `CODE=TIER` overrides as given on the command line
pub fn parse_tier_overrides(values: &[String]) -> Result<HashMap<CategoryCode, Tier>> {
    let mut overrides = HashMap::with_capacity(values.len());
    for value in values {
        let (code, tier) = value.split_once('=').ok_or_else(|| {
            CliError::InvalidInput(format!("Tier override '{}' must look like CODE=TIER", value))
        })?;
        let code = CategoryCode::new(code.trim()).map_err(CliError::InvalidInput)?;
        let tier = Tier::parse(tier.trim()).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Unknown tier '{}', expected Dominant, High, Middle or Low",
                tier.trim()
            ))
        })?;
        overrides.insert(code, tier);
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CategoryCode {
        CategoryCode::new(s).unwrap()
    }

    #[test]
    fn test_parse_bare_array() {
        let results = QuizResults::parse(
            r#"[{"winner": "Ni", "loser": "Fe", "id": 3}, {"winner": "Fe", "loser": "Se"}]"#,
        )
        .unwrap();
        assert_eq!(results.matches.len(), 2);
        assert_eq!(results.matches[0].source_id.as_deref(), Some("3"));
        assert_eq!(results.health.answered().count(), 0);
    }

    #[test]
    fn test_parse_session_object() {
        let results = QuizResults::parse(
            r#"{
                "matches": [{"winner": "Ni", "loser": "Fe", "id": "q1"}],
                "health_answers": [
                    {"target": "Ni", "value": 1},
                    {"target": "Ni", "value": 1},
                    {"target": "Fe", "value": 0}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.health.status(&code("Ni")), HealthStatus::Healthy);
        assert_eq!(results.health.status(&code("Fe")), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(QuizResults::parse(r#"[{"winner": "Ni", "loser": "Ni"}]"#).is_err());
        assert!(QuizResults::parse(r#"[{"winner": "", "loser": "Ni"}]"#).is_err());
        assert!(QuizResults::parse(
            r#"{"matches": [], "health_answers": [{"target": "Ni", "value": 2}]}"#
        )
        .is_err());
        assert!(QuizResults::parse("not json").is_err());
    }

    #[test]
    fn test_health_statuses_cover_function_codes() {
        let results = QuizResults::parse(r#"[{"winner": "Ni", "loser": "Extra"}]"#).unwrap();
        let statuses = results.health_statuses();
        assert_eq!(statuses.len(), 9);
        assert_eq!(statuses[8].0, code("Extra"));
        assert!(statuses.iter().all(|(_, s)| *s == HealthStatus::Normal));
    }

    #[test]
    fn test_tier_overrides() {
        let overrides =
            parse_tier_overrides(&["Ni=Low".to_string(), " Fe = high ".to_string()]).unwrap();
        assert_eq!(overrides[&code("Ni")], Tier::Low);
        assert_eq!(overrides[&code("Fe")], Tier::High);

        assert!(parse_tier_overrides(&["Ni".to_string()]).is_err());
        assert!(parse_tier_overrides(&["Ni=King".to_string()]).is_err());
    }
}
