use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub inputs: InputConfig,

    /// Parameters forwarded to the inference tool
    pub model: ModelConfig,

    /// Job planning settings
    pub batch: BatchConfig,

    /// How the inference tool is launched
    pub tool: ToolConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.tool.validate()?;
        Ok(())
    }
}

/// Where media is read from and written to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory containing `.mp4` video templates
    pub video_dir: PathBuf,

    /// Directory containing `.wav` audio tracks
    pub audio_dir: PathBuf,

    /// Destination for generated videos, created if absent
    pub output_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            video_dir: PathBuf::from("data/Video"),
            audio_dir: PathBuf::from("data/Audio/spk_ganyu"),
            output_dir: PathBuf::from("output/lipsync"),
        }
    }
}

/// Model parameters passed straight through to the inference tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// UNet config file
    pub config_path: PathBuf,

    /// Checkpoint file
    pub ckpt_path: PathBuf,

    /// Number of denoising steps
    pub inference_steps: u32,

    /// Classifier-free guidance scale
    pub guidance_scale: f64,

    /// Pass `--enable_deepcache` to the tool
    pub enable_deepcache: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("configs/unet/stage2_512.yaml"),
            ckpt_path: PathBuf::from("checkpoints/latentsync_unet.pt"),
            inference_steps: 20,
            guidance_scale: 1.5,
            enable_deepcache: true,
        }
    }
}

impl ModelConfig {
    fn validate(&self) -> Result<()> {
        if self.inference_steps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "model.inference_steps".to_string(),
                value: self.inference_steps.to_string()
            }.into());
        }

        if !self.guidance_scale.is_finite() || self.guidance_scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "model.guidance_scale".to_string(),
                value: self.guidance_scale.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Job planning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of audio files to process (unset = all)
    pub max_combinations: Option<usize>,

    /// Seed for reproducible sampling and per-job seeds
    pub random_seed: Option<u64>,

    /// Allow a video template to be picked for more than one job per cycle
    pub allow_repeat_videos: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_combinations: None,
            random_seed: None,
            allow_repeat_videos: true,
        }
    }
}

/// External inference tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable to launch
    pub program: String,

    /// Leading arguments placed before the inference flags
    pub args: Vec<String>,

    /// Working directory for the tool (inherits ours when unset)
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["-m".to_string(), "scripts.inference".to_string()],
            working_dir: None,
        }
    }
}

impl ToolConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tool.program".to_string(),
                value: format!("{:?}", self.program)
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.inference_steps, 20);
        assert!(config.batch.allow_repeat_videos);
        assert!(config.batch.max_combinations.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("settings.toml");

        let mut original_config = Config::default();
        original_config.batch.random_seed = Some(42);
        original_config.model.guidance_scale = 2.0;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.batch.random_seed, Some(42));
        assert_eq!(loaded_config.model.guidance_scale, 2.0);
        assert_eq!(loaded_config.inputs.video_dir, original_config.inputs.video_dir);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[batch]\nmax_combinations = 3\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.batch.max_combinations, Some(3));
        assert!(config.batch.allow_repeat_videos);
        assert_eq!(config.tool.program, "python");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(crate::error::BatchError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_model_config() {
        let mut config = Config::default();
        config.model.inference_steps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.guidance_scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_program_rejected() {
        let mut config = Config::default();
        config.tool.program = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
