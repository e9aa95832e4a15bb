//! # lipsync-batch
//!
//! Batch driver for an external lip-sync inference tool. Audio tracks are
//! paired with randomly chosen video templates and the tool is invoked once
//! per pair, one job at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lipsync_batch::{BatchEngine, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.batch.max_combinations = Some(10);
//! config.batch.random_seed = Some(42);
//!
//! let summary = BatchEngine::new(config).run().await?;
//! println!("{} of {} jobs succeeded", summary.successful, summary.processed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`media`] - discovery of `.mp4` templates and `.wav` tracks
//! - [`planning`] - audio sampling and video selection policy
//! - [`inference`] - command construction and subprocess execution
//! - [`reporting`] - progress lines and the final summary
//! - [`batch`] - the engine tying the stages together
//! - [`config`] - settings file and defaults
//!
//! ## Custom runners
//!
//! The engine accepts anything implementing [`InferenceRunner`], which is
//! how tests drive full batches without launching a process:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use lipsync_batch::{InferenceRunner, JobSpec, RunResult};
//!
//! struct DryRun;
//!
//! impl InferenceRunner for DryRun {
//!     async fn run(&self, job: &JobSpec) -> RunResult {
//!         println!("would write {}", job.output_path.display());
//!         RunResult::succeeded(Duration::ZERO)
//!     }
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod inference;
pub mod media;
pub mod planning;
pub mod reporting;

pub use crate::{
    batch::BatchEngine,
    config::Config,
    error::{BatchError, Result},
    inference::{InferenceRunner, ProcessRunner, RunResult},
    planning::{JobPlanner, JobSpec},
    reporting::BatchSummary,
};
