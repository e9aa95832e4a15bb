use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{
    config::ToolConfig,
    inference::command::InferenceCommand,
    planning::JobSpec,
};

/// Outcome of a single inference job
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub success: bool,

    /// Exit code, if the process ran and was not killed by a signal
    pub exit_code: Option<i32>,

    /// Captured stderr on failure, or the launch error
    pub diagnostics: String,

    /// Wall time spent on the job
    pub duration: Duration,
}

impl RunResult {
    pub fn succeeded(duration: Duration) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            diagnostics: String::new(),
            duration,
        }
    }

    pub fn failed<S: Into<String>>(exit_code: Option<i32>, diagnostics: S, duration: Duration) -> Self {
        Self {
            success: false,
            exit_code,
            diagnostics: diagnostics.into(),
            duration,
        }
    }
}

/// Executes planned jobs
///
/// Implementations never fail: every problem is folded into the returned
/// [`RunResult`] so the batch can continue with the next job.
pub trait InferenceRunner {
    fn run(&self, job: &JobSpec) -> impl Future<Output = RunResult>;
}

/// Runs the inference tool as a child process and waits for it to exit
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    tool: ToolConfig,
}

impl ProcessRunner {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }
}

impl InferenceRunner for ProcessRunner {
    async fn run(&self, job: &JobSpec) -> RunResult {
        let command = InferenceCommand::for_job(&self.tool, job);
        info!("  Command: {}", command.display());

        let started = Instant::now();
        let output = command.to_command().output().await;
        let duration = started.elapsed();

        match output {
            Ok(output) if output.status.success() => {
                debug!("{} finished in {:.1}s", job.output_name(), duration.as_secs_f64());
                RunResult::succeeded(duration)
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
                warn!("Inference exited with {} for {}", output.status, job.output_name());
                RunResult::failed(output.status.code(), stderr, duration)
            }
            Err(e) => {
                warn!("Failed to launch {}: {}", command.program(), e);
                RunResult::failed(
                    None,
                    format!("Failed to launch {}: {}", command.program(), e),
                    duration,
                )
            }
        }
    }
}
