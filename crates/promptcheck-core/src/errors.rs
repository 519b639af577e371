//! Setup-phase error taxonomy.
//!
//! Everything here is fatal for a run. Remote-call failures live in
//! [`crate::providers::llm::GenerationError`] and are downgraded to data by
//! the runner instead of propagating.

use std::path::PathBuf;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A required file or directory is absent at the point of use.
    #[error("missing {what}: {}", path.display())]
    MissingResource { what: String, path: PathBuf },

    /// A cases file or prompt document does not match an accepted shape.
    #[error("invalid format in {}: {detail}", path.display())]
    Format { path: PathBuf, detail: String },

    /// A prompt document parsed but lacks a required field.
    #[error("schema error in {}: {detail}", path.display())]
    Schema { path: PathBuf, detail: String },

    #[error("duplicate case id '{id}' in {}", path.display())]
    DuplicateCaseId { id: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more result artifacts could not be written.
    #[error("failed to write results: {}", failures.join("; "))]
    Write { failures: Vec<String> },
}

impl HarnessError {
    pub fn missing(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingResource {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn format(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn schema(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while loading or validating inputs.
    pub fn is_setup(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}

/// Fails with [`HarnessError::MissingResource`] when `path` does not exist.
pub fn ensure_exists(path: &std::path::Path, what: &str) -> HarnessResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(HarnessError::missing(what, path))
    }
}
