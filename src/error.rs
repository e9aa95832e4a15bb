use thiserror::Error;

/// Main error type for the lipsync-batch library
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Media discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read directory {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

/// Job planning errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("No video files found!")]
    NoVideoFiles,

    #[error("No audio files found!")]
    NoAudioFiles,
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using BatchError
pub type Result<T> = std::result::Result<T, BatchError>;

impl BatchError {
    /// True when the run stopped because one of the input directories had
    /// nothing to process. The binary treats this as a clean early exit.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::Plan(PlanError::NoVideoFiles | PlanError::NoAudioFiles))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Plan(e) => e.to_string(),
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Settings file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
