//! Versioned domain prompt resolution.
//!
//! Resolution order for a domain (first match wins):
//! 1. manifest id `<domain>-vN` -> `<prompts>/<domain>/vN.yaml`, if present
//! 2. manifest id verbatim -> `<prompts>/<domain>/<id>.yaml`, if present
//! 3. `<prompts>/<domain>/v1.yaml`, unchecked
//!
//! The resolver never fails; [`load_prompt`] verifies the result.

use crate::errors::{HarnessError, HarnessResult};
use crate::model::{ActiveVersionMap, PromptDocument};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION_FILE: &str = "v1.yaml";

static VERSION_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v\d+$").unwrap());

/// Version tag of a prompt identifier: the text after the last `-` (or the
/// whole id), accepted only when it looks like `vN`.
pub fn version_suffix(prompt_id: &str) -> Option<&str> {
    let tail = prompt_id.rsplit('-').next().unwrap_or(prompt_id);
    VERSION_TAG.is_match(tail).then_some(tail)
}

pub fn resolve(
    prompts_dir: &Path,
    domain: &str,
    active_versions: Option<&ActiveVersionMap>,
) -> PathBuf {
    let domain_dir = prompts_dir.join(domain);

    if let Some(prompt_id) = active_versions.and_then(|m| m.get(domain)) {
        if let Some(version) = version_suffix(prompt_id) {
            let candidate = domain_dir.join(format!("{}.yaml", version));
            if candidate.exists() {
                return candidate;
            }
        }
        let candidate = domain_dir.join(format!("{}.yaml", prompt_id));
        if candidate.exists() {
            return candidate;
        }
        tracing::warn!(
            domain,
            prompt_id = prompt_id.as_str(),
            "pinned prompt not found; falling back to {}",
            DEFAULT_VERSION_FILE
        );
    }

    domain_dir.join(DEFAULT_VERSION_FILE)
}

/// A resolved, validated domain prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrompt {
    pub path: PathBuf,
    pub core_instructions: String,
}

/// Reads and validates the prompt at `path` for `domain`.
pub fn load_prompt(domain: &str, path: &Path) -> HarnessResult<ResolvedPrompt> {
    if !path.exists() {
        return Err(HarnessError::missing(
            format!("prompt file for {}", domain),
            path,
        ));
    }
    let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    let doc: Option<PromptDocument> = if text.trim().is_empty() {
        None
    } else {
        serde_yaml::from_str(&text)
            .map_err(|e| HarnessError::format(path, format!("failed to parse prompt: {}", e)))?
    };

    let core = doc
        .and_then(|d| d.core_instructions)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if core.is_empty() {
        return Err(HarnessError::schema(path, "no `core_instructions`"));
    }

    Ok(ResolvedPrompt {
        path: path.to_path_buf(),
        core_instructions: core,
    })
}

/// Global rules, a domain marker line, then the domain instructions.
pub fn build_system_prompt(global_rules: &str, domain: &str, core_instructions: &str) -> String {
    format!(
        "{}\n\nAGENT DOMAIN: {}\n\n{}",
        global_rules,
        domain.to_uppercase(),
        core_instructions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn version_suffix_requires_v_number() {
        assert_eq!(version_suffix("interpersonal-v2"), Some("v2"));
        assert_eq!(version_suffix("v7"), Some("v7"));
        assert_eq!(version_suffix("self-care-v10"), Some("v10"));
        assert_eq!(version_suffix("self-care"), None);
        assert_eq!(version_suffix("interpersonal-draft"), None);
    }

    #[test]
    fn non_version_identifier_resolves_by_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        let domain_dir = dir.path().join("emotion");
        fs::create_dir_all(&domain_dir).unwrap();
        fs::write(domain_dir.join("emotion-draft.yaml"), "core_instructions: x").unwrap();

        let map = ActiveVersionMap::from([("emotion".to_string(), "emotion-draft".to_string())]);
        assert_eq!(
            resolve(dir.path(), "emotion", Some(&map)),
            domain_dir.join("emotion-draft.yaml")
        );
    }

    #[test]
    fn load_prompt_rejects_blank_core_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.yaml");
        fs::write(&path, "core_instructions: \"   \"\nnotes: hi\n").unwrap();
        assert!(matches!(
            load_prompt("emotion", &path).unwrap_err(),
            HarnessError::Schema { .. }
        ));

        fs::write(&path, "").unwrap();
        assert!(matches!(
            load_prompt("emotion", &path).unwrap_err(),
            HarnessError::Schema { .. }
        ));
    }

    #[test]
    fn load_prompt_reports_missing_file_with_domain() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prompt("distress", &dir.path().join("v1.yaml")).unwrap_err();
        assert!(err.to_string().contains("prompt file for distress"));
    }

    #[test]
    fn system_prompt_layout_is_fixed() {
        assert_eq!(
            build_system_prompt("Rules.", "emotion", "Respond briefly."),
            "Rules.\n\nAGENT DOMAIN: EMOTION\n\nRespond briefly."
        );
    }
}
