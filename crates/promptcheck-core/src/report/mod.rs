pub mod console;
pub mod csv;
pub mod json;
pub mod markdown;

use crate::errors::{HarnessError, HarnessResult};
use crate::model::ResultRow;
use std::path::{Path, PathBuf};

pub const CSV_FILE: &str = "results.csv";
pub const MARKDOWN_FILE: &str = "results.md";
pub const JSON_FILE: &str = "results.json";

/// Output directory name for a run started at `now`: `YYYYMMDD-HHMMSS`.
pub fn timestamp_dir_name(now: &chrono::DateTime<chrono::Local>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Writes all three artifacts into `dir`, creating it if needed.
///
/// Each format is attempted even if an earlier one failed; failures are
/// collected into a single [`HarnessError::Write`].
pub fn write_all(rows: &[ResultRow], dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| HarnessError::Write {
        failures: vec![format!("{}: {}", dir.display(), e)],
    })?;

    type Writer = fn(&[ResultRow], &Path) -> anyhow::Result<()>;
    let writers: [(&str, Writer); 3] = [
        (CSV_FILE, csv::write_csv),
        (MARKDOWN_FILE, markdown::write_markdown),
        (JSON_FILE, json::write_json),
    ];

    let mut written = Vec::new();
    let mut failures = Vec::new();
    for (name, write) in writers {
        let path = dir.join(name);
        match write(rows, &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to write results");
                failures.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(HarnessError::Write { failures })
    }
}
