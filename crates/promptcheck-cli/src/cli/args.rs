use clap::{Parser, ValueEnum};
use promptcheck_core::config::{
    HarnessConfig, DEFAULT_CASES_PATH, DEFAULT_GLOBAL_PROMPT_PATH, DEFAULT_MANIFEST_PATH,
    DEFAULT_MODEL_ID, DEFAULT_OUT_DIR, DEFAULT_PROMPTS_DIR, DEFAULT_REGION,
};
use promptcheck_core::model::{Environment, DEFAULT_DOMAINS};
use promptcheck_core::providers::llm::GenerationConfig;
use promptcheck_core::providers::retry::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvArg {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl From<EnvArg> for Environment {
    fn from(e: EnvArg) -> Self {
        match e {
            EnvArg::Dev => Environment::Dev,
            EnvArg::Staging => Environment::Staging,
            EnvArg::Prod => Environment::Prod,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderArg {
    /// Live calls to the Bedrock runtime endpoint
    #[default]
    Bedrock,
    /// Deterministic offline replies (dry run)
    Fake,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "promptcheck",
    version,
    about = "Prompt regression harness: run fixed cases through versioned domain prompts and check the replies"
)]
pub struct Cli {
    /// Environment used for manifest version selection
    #[arg(long, value_enum, default_value_t = EnvArg::Dev)]
    pub env: EnvArg,

    /// Path to the cases file
    #[arg(long, default_value = DEFAULT_CASES_PATH)]
    pub cases: PathBuf,

    /// Limit to specific domains
    #[arg(long, num_args = 1.., default_values = DEFAULT_DOMAINS)]
    pub domains: Vec<String>,

    /// Output root; each run writes into a fresh timestamped subdirectory
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub outdir: PathBuf,

    /// Model identifier
    #[arg(long, env = "BEDROCK_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model: String,

    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Credential profile; selects AWS_BEARER_TOKEN_BEDROCK_<PROFILE> when set
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.2)]
    pub temperature: f32,

    /// Max tokens for generation
    #[arg(long, alias = "max_tokens", default_value_t = 220)]
    pub max_tokens: u32,

    #[arg(long, default_value = DEFAULT_GLOBAL_PROMPT_PATH)]
    pub global_prompt: PathBuf,

    #[arg(long, default_value = DEFAULT_PROMPTS_DIR)]
    pub prompts_dir: PathBuf,

    /// Optional manifest pinning prompt versions per environment
    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    pub manifest: PathBuf,

    /// Endpoint base URL (default: https://bedrock-runtime.<region>.amazonaws.com)
    #[arg(long, env = "PROMPTCHECK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Retries after the first failed attempt
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Linear backoff base delay; retry n waits n * this
    #[arg(long, default_value_t = 1500)]
    pub retry_delay_ms: u64,

    #[arg(long, value_enum, default_value_t = ProviderArg::Bedrock)]
    pub provider: ProviderArg,
}

impl Cli {
    pub fn to_config(&self) -> HarnessConfig {
        HarnessConfig {
            env: self.env.into(),
            cases_path: self.cases.clone(),
            global_prompt_path: self.global_prompt.clone(),
            prompts_dir: self.prompts_dir.clone(),
            manifest_path: self.manifest.clone(),
            domains: self.domains.clone(),
            out_dir: self.outdir.clone(),
            generation: GenerationConfig {
                model_id: self.model.clone(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            },
            retry: RetryPolicy {
                max_retries: self.retries,
                base_delay: Duration::from_millis(self.retry_delay_ms),
            },
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}
