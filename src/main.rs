use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use lipsync_batch::{BatchEngine, Config};

#[derive(Parser)]
#[command(
    name = "lipsync-batch",
    version,
    about = "Batch lip-sync inference over video templates and audio tracks",
    long_about = "Pairs every audio track with a randomly chosen video template and runs the lip-sync inference tool once per pair, reporting progress and a final summary."
)]
struct Cli {
    /// Directory containing video templates (.mp4)
    #[arg(long, alias = "video_dir")]
    video_dir: Option<PathBuf>,

    /// Directory containing audio files (.wav)
    #[arg(long, alias = "audio_dir")]
    audio_dir: Option<PathBuf>,

    /// Output directory for generated videos
    #[arg(long, alias = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Path to UNet config file
    #[arg(long, alias = "config_path")]
    config_path: Option<PathBuf>,

    /// Path to checkpoint file
    #[arg(long, alias = "ckpt_path")]
    ckpt_path: Option<PathBuf>,

    /// Number of inference steps
    #[arg(long, alias = "inference_steps")]
    inference_steps: Option<u32>,

    /// Guidance scale
    #[arg(long, alias = "guidance_scale")]
    guidance_scale: Option<f64>,

    /// Enable DeepCache for faster inference
    #[arg(long, alias = "enable_deepcache", action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    enable_deepcache: Option<bool>,

    /// Maximum number of video-audio combinations to process
    #[arg(long, alias = "max_combinations")]
    max_combinations: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long, alias = "random_seed")]
    random_seed: Option<u64>,

    /// Allow the same video to be selected multiple times
    #[arg(long, alias = "allow_repeat_videos", action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    allow_repeat_videos: Option<bool>,

    /// Inference executable (defaults to python)
    #[arg(long)]
    program: Option<String>,

    /// Settings file (TOML); command-line flags take precedence
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Settings file (or defaults) with command-line values layered on top
    fn resolve_config(self) -> Result<Config> {
        let mut config = match &self.settings {
            Some(settings_path) => {
                info!("Loading settings from {:?}", settings_path);
                Config::from_file(settings_path)?
            }
            None => Config::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overlay command-line values on top of the loaded settings
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.video_dir {
            config.inputs.video_dir = dir;
        }
        if let Some(dir) = self.audio_dir {
            config.inputs.audio_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.inputs.output_dir = dir;
        }
        if let Some(path) = self.config_path {
            config.model.config_path = path;
        }
        if let Some(path) = self.ckpt_path {
            config.model.ckpt_path = path;
        }
        if let Some(steps) = self.inference_steps {
            config.model.inference_steps = steps;
        }
        if let Some(scale) = self.guidance_scale {
            config.model.guidance_scale = scale;
        }
        if let Some(enable) = self.enable_deepcache {
            config.model.enable_deepcache = enable;
        }
        if let Some(allow) = self.allow_repeat_videos {
            config.batch.allow_repeat_videos = allow;
        }
        if let Some(program) = self.program {
            config.tool.program = program;
        }
        if self.max_combinations.is_some() {
            config.batch.max_combinations = self.max_combinations;
        }
        if self.random_seed.is_some() {
            config.batch.random_seed = self.random_seed;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose when set
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting lipsync-batch v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.resolve_config()?;
    let engine = BatchEngine::new(config);
    match engine.run().await {
        Ok(_) => Ok(()),
        Err(e) if e.is_missing_input() => {
            println!("{}", e.user_message());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
