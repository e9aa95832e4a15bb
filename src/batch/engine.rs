use tracing::{debug, info};

use crate::{
    config::Config,
    error::Result,
    inference::{InferenceRunner, ProcessRunner},
    media::{discover, MediaFile, MediaKind},
    planning::{JobPlanner, JobSpec},
    reporting::{BatchReporter, BatchSummary},
};

/// Runs a complete batch
///
/// The pipeline is strictly sequential:
/// 1. Discovery - list `.mp4` templates and `.wav` tracks
/// 2. Planning - pair each selected audio track with a video
/// 3. Execution - invoke the inference tool once per pair
/// 4. Reporting - progress after each job, then a summary
pub struct BatchEngine {
    config: Config,
}

impl BatchEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the batch with the configured external tool
    pub async fn run(&self) -> Result<BatchSummary> {
        let runner = ProcessRunner::new(self.config.tool.clone());
        self.run_with(&runner).await
    }

    /// Run the batch with a caller-supplied runner
    ///
    /// Returns an error only when inputs are missing or the output directory
    /// cannot be created. Individual job failures are counted, not raised.
    pub async fn run_with<R: InferenceRunner>(&self, runner: &R) -> Result<BatchSummary> {
        // Step 1: Discovery
        let (audio_files, video_files) = self.discover_inputs()?;

        // Step 2: Planning
        let jobs = JobPlanner::from_config(&self.config).plan(&audio_files, &video_files)?;

        let output_dir = &self.config.inputs.output_dir;
        std::fs::create_dir_all(output_dir)?;
        println!("Output directory: {}", output_dir.display());
        println!("Total combinations to process: {}", jobs.len());
        println!("Processing strategy: Randomly sample one video per audio file");

        // Steps 3 and 4: Execution with progress
        let summary = self.execute(&jobs, runner).await;

        println!("\n{}", summary);
        info!("Batch finished: {}/{} succeeded", summary.successful, summary.processed);
        Ok(summary)
    }

    fn discover_inputs(&self) -> Result<(Vec<MediaFile>, Vec<MediaFile>)> {
        let inputs = &self.config.inputs;
        println!("Scanning for video and audio files...");

        let video_files = discover(&inputs.video_dir, MediaKind::Video)?;
        let audio_files = discover(&inputs.audio_dir, MediaKind::Audio)?;

        print_listing(MediaKind::Video, &video_files);
        print_listing(MediaKind::Audio, &audio_files);

        Ok((audio_files, video_files))
    }

    async fn execute<R: InferenceRunner>(&self, jobs: &[JobSpec], runner: &R) -> BatchSummary {
        let mut reporter = BatchReporter::new(jobs.len(), self.config.inputs.output_dir.clone());

        for job in jobs {
            reporter.announce(job);
            let result = runner.run(job).await;
            debug!("Job {} finished: success={}", job.ordinal, result.success);
            reporter.report(job, &result);
        }

        reporter.summary()
    }
}

fn print_listing(kind: MediaKind, files: &[MediaFile]) {
    println!("Found {} {} files:", files.len(), kind.label());
    for file in files {
        println!("  - {}", file.file_name());
    }
}
