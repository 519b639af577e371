use crate::cases::load_cases;
use crate::config::HarnessConfig;
use crate::errors::{ensure_exists, HarnessError, HarnessResult};
use crate::manifest::load_active_versions;
use crate::model::{ActiveVersionMap, Case};
use std::path::Path;

/// Everything a run needs from disk, loaded once before any case is processed.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub global_rules: String,
    pub cases: Vec<Case>,
    pub active_versions: Option<ActiveVersionMap>,
}

pub fn read_trimmed(path: &Path) -> HarnessResult<String> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| HarnessError::io(path, e))
}

pub fn load_inputs(cfg: &HarnessConfig) -> HarnessResult<RunInputs> {
    ensure_exists(&cfg.global_prompt_path, "global system prompt")?;
    ensure_exists(&cfg.cases_path, "cases file")?;
    ensure_exists(&cfg.prompts_dir, "prompts directory")?;

    let global_rules = read_trimmed(&cfg.global_prompt_path)?;
    let cases = load_cases(&cfg.cases_path)?;
    let active_versions = load_active_versions(&cfg.manifest_path, cfg.env)?;

    tracing::debug!(
        cases = cases.len(),
        pinned = active_versions.as_ref().map(|m| m.len()).unwrap_or(0),
        "loaded run inputs"
    );

    Ok(RunInputs {
        global_rules,
        cases,
        active_versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(dir: &Path) -> HarnessConfig {
        HarnessConfig {
            cases_path: dir.join("cases.yaml"),
            global_prompt_path: dir.join("global_system_prompt.txt"),
            prompts_dir: dir.join("prompts"),
            manifest_path: dir.join("manifest.yaml"),
            ..Default::default()
        }
    }

    #[test]
    fn trims_global_rules_and_loads_cases() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("global_system_prompt.txt"), "\n  Be kind.  \n").unwrap();
        fs::write(dir.path().join("cases.yaml"), "emotion: [\"sad\"]\n").unwrap();
        fs::create_dir(dir.path().join("prompts")).unwrap();

        let inputs = load_inputs(&config_in(dir.path())).unwrap();
        assert_eq!(inputs.global_rules, "Be kind.");
        assert_eq!(inputs.cases.len(), 1);
        assert!(inputs.active_versions.is_none());
    }

    #[test]
    fn missing_prompts_dir_fails_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("global_system_prompt.txt"), "rules").unwrap();
        fs::write(dir.path().join("cases.yaml"), "not: [valid").unwrap();

        let err = load_inputs(&config_in(dir.path())).unwrap_err();
        match err {
            HarnessError::MissingResource { what, .. } => assert_eq!(what, "prompts directory"),
            other => panic!("expected MissingResource, got {other:?}"),
        }
    }

    #[test]
    fn missing_global_prompt_is_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_inputs(&config_in(dir.path())).unwrap_err();
        assert!(err.to_string().starts_with("missing global system prompt"));
    }
}
