use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    inference::RunResult,
    planning::JobSpec,
    reporting::summary::BatchSummary,
};

/// Running state after a job completes
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// `remaining × (elapsed / completed)`
    pub fn estimated_remaining(&self) -> Duration {
        if self.completed == 0 {
            return Duration::ZERO;
        }
        let remaining = self.total.saturating_sub(self.completed);
        self.elapsed.mul_f64(remaining as f64 / self.completed as f64)
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Progress: {}/{} ({:.1}%)", self.completed, self.total, self.percent())?;
        writeln!(f, "Successful: {}, Failed: {}", self.succeeded, self.failed)?;
        writeln!(f, "Elapsed time: {:.1} minutes", self.elapsed.as_secs_f64() / 60.0)?;
        write!(f, "Estimated remaining time: {:.1} minutes",
               self.estimated_remaining().as_secs_f64() / 60.0)
    }
}

/// Accumulates job outcomes and prints progress for a batch
pub struct BatchReporter {
    total: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
    started: Instant,
    output_dir: PathBuf,
}

impl BatchReporter {
    /// Start the clock for a batch of `total` jobs
    pub fn new<P: Into<PathBuf>>(total: usize, output_dir: P) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            started: Instant::now(),
            output_dir: output_dir.into(),
        }
    }

    /// Lines printed before a job is launched
    pub fn job_header(&self, job: &JobSpec) -> String {
        format!(
            "\n[{}/{}] Processing combination...\n  Audio: {}\n  Randomly selected video: {}\n  Output: {}\n  Seed: {}",
            job.ordinal,
            self.total,
            job.audio.file_name(),
            job.video.file_name(),
            job.output_name(),
            job.seed,
        )
    }

    pub fn announce(&self, job: &JobSpec) {
        println!("{}", self.job_header(job));
    }

    /// Count a finished job and print its outcome and progress
    pub fn report(&mut self, job: &JobSpec, result: &RunResult) -> ProgressSnapshot {
        if result.success {
            println!("✓ Successfully generated: {}", job.output_name());
        } else {
            println!("✗ Error generating {}:", job.output_name());
            println!("  Error: {}", result.diagnostics);
        }

        let snapshot = self.record(result, self.started.elapsed());
        println!("{}", snapshot);
        snapshot
    }

    /// Count a finished job given the batch time elapsed so far
    pub fn record(&mut self, result: &RunResult, elapsed: Duration) -> ProgressSnapshot {
        self.completed += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        debug!("Job {}/{} took {:.1}s", self.completed, self.total, result.duration.as_secs_f64());

        ProgressSnapshot {
            completed: self.completed,
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            elapsed,
        }
    }

    /// Final totals, timed from when the reporter was created
    pub fn summary(&self) -> BatchSummary {
        self.summary_at(self.started.elapsed())
    }

    pub fn summary_at(&self, total_time: Duration) -> BatchSummary {
        BatchSummary {
            processed: self.completed,
            successful: self.succeeded,
            failed: self.failed,
            total_time,
            output_dir: self.output_dir.clone(),
        }
    }
}
