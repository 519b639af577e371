use crate::checks::TraitChecks;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Deployment environment a manifest pins prompt versions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domains selected when no subset is requested.
pub const DEFAULT_DOMAINS: [&str; 4] = ["interpersonal", "emotion", "mindfulness", "distress"];

/// One fixed test input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub domain: String,
    pub input: String,
    pub expect_traits: Vec<String>,
}

/// Domain name -> active prompt identifier (e.g. `interpersonal-v2`) for one environment.
pub type ActiveVersionMap = BTreeMap<String, String>;

/// Parsed domain prompt file. Only `core_instructions` is required; other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptDocument {
    #[serde(default)]
    pub core_instructions: Option<String>,
}

/// One processed case. Written once at run end and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub timestamp: String,
    pub env: String,
    pub model_id: String,
    pub domain: String,
    pub prompt_file: String,
    pub case_id: String,
    pub input: String,
    pub output: String,
    pub checks: TraitChecks,
    /// Expected traits recorded as `true` without evaluation; need human scoring.
    pub unverified_traits: Vec<String>,
}

impl ResultRow {
    pub fn is_error(&self) -> bool {
        self.output.starts_with(crate::engine::ERROR_MARKER)
    }
}
