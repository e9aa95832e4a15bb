use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{config::ModelConfig, media::MediaFile};

/// Model parameters resolved for a job
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceParams {
    pub config_path: PathBuf,
    pub ckpt_path: PathBuf,
    pub inference_steps: u32,
    pub guidance_scale: f64,
    pub enable_deepcache: bool,
}

impl From<&ModelConfig> for InferenceParams {
    fn from(model: &ModelConfig) -> Self {
        Self {
            config_path: model.config_path.clone(),
            ckpt_path: model.ckpt_path.clone(),
            inference_steps: model.inference_steps,
            guidance_scale: model.guidance_scale,
            enable_deepcache: model.enable_deepcache,
        }
    }
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

/// One planned (audio, video) combination with everything the runner needs
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// 1-based position in the run
    pub ordinal: usize,

    pub audio: MediaFile,
    pub video: MediaFile,
    pub params: InferenceParams,

    /// Seed handed to the inference tool
    pub seed: u64,

    /// Where the tool should write the synced video
    pub output_path: PathBuf,
}

impl JobSpec {
    /// Output file name for log lines
    pub fn output_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Videos already handed out in the current no-repeat cycle
#[derive(Debug, Clone, Default)]
pub struct UsedVideoSet {
    used: HashSet<PathBuf>,
}

impl UsedVideoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, video: &Path) -> bool {
        self.used.insert(video.to_path_buf())
    }

    pub fn contains(&self, video: &Path) -> bool {
        self.used.contains(video)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// True once every video in a pool of `pool_size` has been used
    pub fn is_exhausted(&self, pool_size: usize) -> bool {
        self.used.len() >= pool_size
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}
