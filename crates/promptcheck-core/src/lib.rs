//! Prompt regression harness: sends fixed test inputs through versioned,
//! domain-scoped system prompts and applies heuristic checks to the replies.

pub mod cases;
pub mod checks;
pub mod config;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod prompts;
pub mod providers;
pub mod report;

pub use config::HarnessConfig;
pub use errors::{HarnessError, HarnessResult};
