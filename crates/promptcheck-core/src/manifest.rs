//! Optional manifest pinning the active prompt per environment and domain.
//!
//! ```yaml
//! defaults:
//!   dev:
//!     interpersonal: interpersonal-v2
//! ```

use crate::errors::{HarnessError, HarnessResult};
use crate::model::{ActiveVersionMap, Environment};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub defaults: BTreeMap<String, ActiveVersionMap>,
}

impl Manifest {
    pub fn active_versions(&self, env: Environment) -> Option<&ActiveVersionMap> {
        self.defaults.get(env.as_str())
    }
}

/// Active versions for `env`, or `None` when the manifest file or the env entry is absent.
pub fn load_active_versions(
    path: &Path,
    env: Environment,
) -> HarnessResult<Option<ActiveVersionMap>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no manifest; using default prompt versions");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    let manifest: Option<Manifest> = serde_yaml::from_str(&text)
        .map_err(|e| HarnessError::format(path, format!("failed to parse manifest: {}", e)))?;
    Ok(manifest.and_then(|m| m.active_versions(env).cloned()))
}
