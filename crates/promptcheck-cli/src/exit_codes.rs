//! Process exit codes. Part of the public contract.

use promptcheck_core::HarnessError;

pub const SUCCESS: i32 = 0; // Run completed (per-case generation errors included)
pub const WRITE_ERROR: i32 = 1; // One or more result files could not be written
pub const CONFIG_ERROR: i32 = 2; // Missing resource, malformed cases/prompt/manifest

/// Exit code for a fatal error surfaced from a run.
pub fn for_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<HarnessError>() {
        Some(HarnessError::Write { .. }) => WRITE_ERROR,
        _ => CONFIG_ERROR,
    }
}
