use crate::checks::check;
use crate::config::HarnessConfig;
use crate::errors::HarnessResult;
use crate::loader::RunInputs;
use crate::model::{Case, ResultRow};
use crate::prompts::{build_system_prompt, load_prompt, resolve, ResolvedPrompt};
use crate::providers::llm::{ChatClient, GenerationError};
use crate::report::console::RowSink;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Prefix of the output recorded for a case whose generation failed.
pub const ERROR_MARKER: &str = "[ERROR]";

pub fn error_marker(e: &GenerationError) -> String {
    format!("{} {}: {}", ERROR_MARKER, e.kind(), e)
}

/// Row timestamp for a run started at `started_at`: `%Y-%m-%d %H:%M:%S`.
pub fn row_timestamp(started_at: &DateTime<Local>) -> String {
    started_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Cases whose domain is in `domains`, in file order.
pub fn select_cases<'a>(cases: &'a [Case], cfg: &HarnessConfig) -> Vec<&'a Case> {
    cases
        .iter()
        .filter(|c| cfg.includes_domain(&c.domain))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cases: usize,
    pub generation_errors: usize,
    pub rows_with_failed_checks: usize,
}

impl RunSummary {
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        Self {
            cases: rows.len(),
            generation_errors: rows.iter().filter(|r| r.is_error()).count(),
            rows_with_failed_checks: rows
                .iter()
                .filter(|r| !r.checks.failed().is_empty())
                .count(),
        }
    }
}

/// Per-run prompt cache. The same domain always resolves to the same file within a run.
#[derive(Debug, Default)]
struct PromptCache {
    by_domain: HashMap<String, ResolvedPrompt>,
}

impl PromptCache {
    fn get_or_load(
        &mut self,
        cfg: &HarnessConfig,
        inputs: &RunInputs,
        domain: &str,
    ) -> HarnessResult<&ResolvedPrompt> {
        if !self.by_domain.contains_key(domain) {
            let path = resolve(&cfg.prompts_dir, domain, inputs.active_versions.as_ref());
            let prompt = load_prompt(domain, &path)?;
            info!(domain, prompt_file = %prompt.path.display(), "resolved prompt");
            self.by_domain.insert(domain.to_string(), prompt);
        }
        Ok(&self.by_domain[domain])
    }
}

pub struct Runner {
    pub client: Arc<dyn ChatClient>,
    /// Called once per processed case, in order.
    pub on_row: Option<RowSink>,
}

impl Runner {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            on_row: None,
        }
    }

    pub fn with_row_sink(mut self, sink: RowSink) -> Self {
        self.on_row = Some(sink);
        self
    }

    /// Processes the selected cases sequentially and returns one row per case.
    ///
    /// Prompt problems for any selected domain abort before the first remote
    /// call. Generation failures are recorded as error-marker outputs and the
    /// run continues.
    pub async fn run(
        &self,
        cfg: &HarnessConfig,
        inputs: &RunInputs,
    ) -> HarnessResult<Vec<ResultRow>> {
        self.run_at(cfg, inputs, &Local::now()).await
    }

    /// Like [`Runner::run`], stamping every row with `started_at`.
    pub async fn run_at(
        &self,
        cfg: &HarnessConfig,
        inputs: &RunInputs,
        started_at: &DateTime<Local>,
    ) -> HarnessResult<Vec<ResultRow>> {
        let timestamp = row_timestamp(started_at);
        let selected = select_cases(&inputs.cases, cfg);
        let mut prompts = PromptCache::default();

        for case in &selected {
            prompts.get_or_load(cfg, inputs, &case.domain)?;
        }

        info!(
            provider = self.client.provider_name(),
            cases = selected.len(),
            "starting run"
        );

        let mut rows = Vec::with_capacity(selected.len());
        for case in selected {
            let prompt = prompts.get_or_load(cfg, inputs, &case.domain)?;
            let system_prompt =
                build_system_prompt(&inputs.global_rules, &case.domain, &prompt.core_instructions);

            let output = match self
                .client
                .send(&system_prompt, &case.input, &cfg.generation)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        case_id = case.id.as_str(),
                        domain = case.domain.as_str(),
                        error = %e,
                        "generation failed"
                    );
                    error_marker(&e)
                }
            };

            let checks = check(&output, &case.expect_traits);
            let row = ResultRow {
                timestamp: timestamp.clone(),
                env: cfg.env.to_string(),
                model_id: cfg.generation.model_id.clone(),
                domain: case.domain.clone(),
                prompt_file: prompt.path.display().to_string(),
                case_id: case.id.clone(),
                input: case.input.clone(),
                output,
                unverified_traits: checks.unverified(),
                checks,
            };

            if let Some(sink) = &self.on_row {
                sink(&row);
            }
            rows.push(row);
        }

        let summary = RunSummary::from_rows(&rows);
        info!(
            cases = summary.cases,
            generation_errors = summary.generation_errors,
            rows_with_failed_checks = summary.rows_with_failed_checks,
            "run complete"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::FakeClient;

    fn case(id: &str, domain: &str) -> Case {
        Case {
            id: id.into(),
            domain: domain.into(),
            input: "hi".into(),
            expect_traits: vec![],
        }
    }

    #[test]
    fn select_preserves_order_and_filters_domains() {
        let cases = vec![
            case("A", "emotion"),
            case("B", "other"),
            case("C", "interpersonal"),
        ];
        let cfg = HarnessConfig::default();
        let ids: Vec<_> = select_cases(&cases, &cfg).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn error_marker_names_kind_and_message() {
        let marker = error_marker(&GenerationError::HttpStatus {
            status: 429,
            body: "slow down".into(),
        });
        assert_eq!(
            marker,
            "[ERROR] HttpStatusError: endpoint returned status 429: slow down"
        );
    }

    #[tokio::test]
    async fn rows_carry_the_given_start_instant() {
        use chrono::TimeZone;

        let dir = tempfile::tempdir().unwrap();
        let domain_dir = dir.path().join("emotion");
        std::fs::create_dir_all(&domain_dir).unwrap();
        std::fs::write(domain_dir.join("v1.yaml"), "core_instructions: x\n").unwrap();
        let cfg = HarnessConfig {
            prompts_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let inputs = RunInputs {
            global_rules: "rules".into(),
            cases: vec![case("A", "emotion"), case("B", "emotion")],
            active_versions: None,
        };

        let started = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        let rows = Runner::new(Arc::new(FakeClient::new()))
            .run_at(&cfg, &inputs, &started)
            .await
            .unwrap();
        assert!(rows.iter().all(|r| r.timestamp == "2024-03-09 07:05:02"));
        assert_eq!(
            crate::report::timestamp_dir_name(&started),
            "20240309-070502"
        );
    }

    #[tokio::test]
    async fn missing_domain_prompt_aborts_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HarnessConfig {
            prompts_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let inputs = RunInputs {
            global_rules: "rules".into(),
            cases: vec![case("A", "emotion")],
            active_versions: None,
        };
        let client = Arc::new(FakeClient::new());
        let runner = Runner::new(client.clone());

        let err = runner.run(&cfg, &inputs).await.unwrap_err();
        assert!(err.to_string().contains("prompt file for emotion"));
        assert_eq!(client.calls(), 0);
    }
}
