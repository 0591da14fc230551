//! Error types shared across Cuesmith crates.

use std::path::PathBuf;

/// Top-level error type for Cuesmith operations.
#[derive(Debug, thiserror::Error)]
pub enum CuesmithError {
    /// The supplied input was rejected before any state changed.
    #[error("Input rejected: {message}")]
    InvalidInput { message: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    /// Segmentation requires a known, positive media duration.
    #[error("Media duration unavailable or invalid: {duration}")]
    InvalidDuration { duration: f64 },

    #[error("Cue not found: {id}")]
    CueNotFound { id: u64 },

    #[error("Invalid cue timing: start={start:.3} end={end:.3}")]
    InvalidTiming { start: f64, end: f64 },

    #[error("Sign in required")]
    Unauthenticated,

    #[error("No audio source loaded")]
    NoSource,

    #[error("Cue file parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CuesmithError.
pub type CuesmithResult<T> = Result<T, CuesmithError>;

impl CuesmithError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription {
            message: msg.into(),
        }
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the user can reasonably retry the action that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transcription { .. } | Self::Io(_))
    }
}
