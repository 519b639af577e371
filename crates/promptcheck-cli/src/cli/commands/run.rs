use super::super::args::{Cli, ProviderArg};
use crate::exit_codes;
use promptcheck_core::config::HarnessConfig;
use promptcheck_core::engine::Runner;
use promptcheck_core::loader::load_inputs;
use promptcheck_core::providers::llm::bedrock::{api_key_from_env, API_KEY_ENV};
use promptcheck_core::providers::llm::{BedrockClient, ChatClient, FakeClient};
use promptcheck_core::report::console::{default_row_sink, print_run_header};
use promptcheck_core::report::{timestamp_dir_name, write_all};
use std::sync::Arc;

pub(crate) fn build_client(cfg: &HarnessConfig, provider: ProviderArg) -> Arc<dyn ChatClient> {
    match provider {
        ProviderArg::Fake => Arc::new(FakeClient::new()),
        ProviderArg::Bedrock => {
            let key = api_key_from_env(cfg.profile.as_deref());
            if key.is_none() {
                tracing::warn!(
                    "no bearer token found ({} or profile-scoped variant); requests are sent unauthenticated",
                    API_KEY_ENV
                );
            }
            Arc::new(BedrockClient::new(cfg.endpoint_url(), key, cfg.retry))
        }
    }
}

pub(crate) async fn run(cli: Cli) -> anyhow::Result<i32> {
    let cfg = cli.to_config();

    // Setup errors surface here, before any network traffic.
    let inputs = load_inputs(&cfg)?;
    let client = build_client(&cfg, cli.provider);

    // One instant names the output directory and stamps every row.
    let started_at = chrono::Local::now();
    let out_dir = cfg.out_dir.join(timestamp_dir_name(&started_at));

    print_run_header(
        cfg.env.as_str(),
        &cfg.generation.model_id,
        &cfg.region,
        cfg.profile.as_deref(),
        inputs.cases.len(),
        &cfg.domains,
        &out_dir,
    );

    let rows = Runner::new(client)
        .with_row_sink(default_row_sink())
        .run_at(&cfg, &inputs, &started_at)
        .await?;

    for path in write_all(&rows, &out_dir)? {
        println!("Saved: {}", path.display());
    }
    Ok(exit_codes::SUCCESS)
}
