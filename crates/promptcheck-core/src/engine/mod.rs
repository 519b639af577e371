pub mod runner;

pub use runner::{row_timestamp, Runner, RunSummary, ERROR_MARKER};
