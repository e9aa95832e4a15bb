//! # Progress Reporting
//!
//! Per-job progress lines, remaining-time estimates and the end-of-run
//! summary. Everything here is printed to stdout; diagnostics go through
//! `tracing` instead.

pub mod reporter;
pub mod summary;

pub use reporter::{BatchReporter, ProgressSnapshot};
pub use summary::BatchSummary;
