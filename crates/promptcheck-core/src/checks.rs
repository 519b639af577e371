//! Heuristic trait checks applied to every generated response.
//!
//! The four heuristics are deterministic string predicates. Expected traits
//! that no heuristic covers are recorded as `true` placeholders and flagged
//! as unverified; they need a human scorer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const BRIEF: &str = "brief";
pub const NO_QUESTION_STACKING: &str = "no_question_stacking";
pub const NO_UNEXPECTED_HANDOFF: &str = "no_unexpected_handoff";
pub const UNDER_500_CHARS: &str = "under_500_chars";

pub const HANDOFF_MARKER: &str = "HANDOFF_READY";
const MAX_SENTENCES: usize = 2;
const MAX_QUESTIONS: usize = 2;
const MAX_CHARS: usize = 500;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+(\s|$)").unwrap());

/// Naive sentence count: runs of `.`, `!`, `?` followed by whitespace or end of text.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_END.find_iter(text).count()
}

pub fn brief(text: &str) -> bool {
    sentence_count(text) <= MAX_SENTENCES
}

pub fn no_question_stacking(text: &str) -> bool {
    text.matches('?').count() <= MAX_QUESTIONS
}

pub fn no_unexpected_handoff(text: &str) -> bool {
    !text.contains(HANDOFF_MARKER)
}

pub fn under_500_chars(text: &str) -> bool {
    text.chars().count() <= MAX_CHARS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitCheck {
    pub name: String,
    pub passed: bool,
    /// False for placeholder entries that were never evaluated.
    pub verified: bool,
}

/// Ordered check results: heuristics first, then expected-trait placeholders.
///
/// Serializes as a `name -> bool` map in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitChecks {
    entries: Vec<TraitCheck>,
}

impl TraitChecks {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|c| c.name == name).map(|c| c.passed)
    }

    pub fn entries(&self) -> &[TraitCheck] {
        &self.entries
    }

    pub fn unverified(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|c| !c.verified)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Names of evaluated checks that did not pass.
    pub fn failed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|c| c.verified && !c.passed)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Compact JSON object, used for the tabular and document outputs.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn push(&mut self, name: &str, passed: bool, verified: bool) {
        self.entries.push(TraitCheck {
            name: name.to_string(),
            passed,
            verified,
        });
    }
}

impl Serialize for TraitChecks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for c in &self.entries {
            map.serialize_entry(&c.name, &c.passed)?;
        }
        map.end()
    }
}

/// Runs all heuristics on `text` and appends placeholders for uncovered `expected` traits.
pub fn check(text: &str, expected: &[String]) -> TraitChecks {
    let mut checks = TraitChecks::default();
    checks.push(BRIEF, brief(text), true);
    checks.push(NO_QUESTION_STACKING, no_question_stacking(text), true);
    checks.push(NO_UNEXPECTED_HANDOFF, no_unexpected_handoff(text), true);
    checks.push(UNDER_500_CHARS, under_500_chars(text), true);

    for name in expected {
        if checks.get(name).is_none() {
            checks.push(name, true, false);
        }
    }
    checks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_counts_sentence_terminators() {
        assert_eq!(sentence_count("Hi. How are you?"), 2);
        assert!(brief("Hi. How are you?"));
        assert_eq!(sentence_count("Hi. How are you? Are you sure? Really?"), 4);
        assert!(!brief("Hi. How are you? Are you sure? Really?"));
    }

    #[test]
    fn brief_treats_punctuation_runs_as_one_terminator() {
        assert_eq!(sentence_count("Wait... what?! Okay."), 3);
        assert_eq!(sentence_count("version 1.2 is out"), 0);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn question_stacking_counts_literal_marks() {
        assert!(no_question_stacking("One? Two?"));
        assert!(!no_question_stacking("a?b?c?"));
        assert!(!no_question_stacking("???"));
    }

    #[test]
    fn handoff_marker_is_case_sensitive() {
        assert!(!no_unexpected_handoff("ok HANDOFF_READY"));
        assert!(no_unexpected_handoff("handoff_ready"));
    }

    #[test]
    fn length_boundary_is_inclusive_at_500_chars() {
        assert!(under_500_chars(&"a".repeat(500)));
        assert!(!under_500_chars(&"a".repeat(501)));
        // multibyte characters count once each
        assert!(under_500_chars(&"é".repeat(500)));
    }

    #[test]
    fn uncovered_expected_traits_are_unverified_placeholders() {
        let expected = vec!["brief".to_string(), "validates_feelings".to_string()];
        let checks = check("Hi. How are you? Really? Truly?", &expected);

        assert_eq!(checks.get(BRIEF), Some(false));
        assert_eq!(checks.get("validates_feelings"), Some(true));
        assert_eq!(checks.unverified(), vec!["validates_feelings".to_string()]);
        assert_eq!(checks.failed(), vec![BRIEF, NO_QUESTION_STACKING]);
        assert_eq!(checks.entries().len(), 5);
    }

    #[test]
    fn serializes_in_insertion_order() {
        let checks = check("Fine.", &["warmth".to_string()]);
        assert_eq!(
            checks.to_json_string(),
            r#"{"brief":true,"no_question_stacking":true,"no_unexpected_handoff":true,"under_500_chars":true,"warmth":true}"#
        );
    }
}
