//! Run configuration, built once at process start and passed down by reference.

use crate::model::{Environment, DEFAULT_DOMAINS};
use crate::providers::llm::GenerationConfig;
use crate::providers::retry::RetryPolicy;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_GLOBAL_PROMPT_PATH: &str = "global_system_prompt.txt";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_CASES_PATH: &str = "eval/cases.yaml";
pub const DEFAULT_MANIFEST_PATH: &str = "manifest.yaml";
pub const DEFAULT_OUT_DIR: &str = "eval/results";

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub env: Environment,
    pub cases_path: PathBuf,
    pub global_prompt_path: PathBuf,
    pub prompts_dir: PathBuf,
    /// Optional; a missing file means no versions are pinned.
    pub manifest_path: PathBuf,
    pub domains: Vec<String>,
    pub out_dir: PathBuf,
    pub generation: GenerationConfig,
    pub retry: RetryPolicy,
    pub region: String,
    pub profile: Option<String>,
    /// Endpoint base URL override; derived from `region` when unset.
    pub endpoint: Option<String>,
}

impl HarnessConfig {
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    pub fn includes_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            env: Environment::Dev,
            cases_path: PathBuf::from(DEFAULT_CASES_PATH),
            global_prompt_path: PathBuf::from(DEFAULT_GLOBAL_PROMPT_PATH),
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            generation: GenerationConfig::default(),
            retry: RetryPolicy::default(),
            region: DEFAULT_REGION.to_string(),
            profile: None,
            endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_derives_from_region_unless_overridden() {
        let mut cfg = HarnessConfig {
            region: "eu-central-1".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.endpoint_url(),
            "https://bedrock-runtime.eu-central-1.amazonaws.com"
        );
        cfg.endpoint = Some("http://127.0.0.1:9000".into());
        assert_eq!(cfg.endpoint_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn default_selects_all_four_domains() {
        let cfg = HarnessConfig::default();
        assert!(cfg.includes_domain("distress"));
        assert!(!cfg.includes_domain("other"));
        assert_eq!(cfg.generation.model_id, DEFAULT_MODEL_ID);
    }
}
