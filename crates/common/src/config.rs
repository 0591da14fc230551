//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CuesmithError, CuesmithResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Transcript segmentation heuristics.
    pub segmentation: SegmentationConfig,

    /// Cue editing behavior.
    pub editor: EditorConfig,

    /// Hosted transcription service.
    pub transcription: TranscriptionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters for turning a flat transcript into timed cues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Words grouped into one cue.
    pub words_per_cue: usize,

    /// Nominal cue length in seconds before word-length weighting.
    pub base_cue_secs: f64,

    /// Average word length that maps to a 1.0 duration multiplier.
    pub avg_word_length_divisor: f64,

    pub min_duration_multiplier: f64,
    pub max_duration_multiplier: f64,
}

/// Editing parameters for manual cue adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Step applied by a single nudge of a cue bound.
    pub nudge_step_secs: f64,

    /// Minimum distance kept between a cue's start and end when nudging.
    pub min_cue_secs: f64,
}

/// Hosted speech-to-text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Endpoint accepting a multipart audio upload.
    pub endpoint: String,

    /// Model identifier sent with each request.
    pub model: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Default language hint (ISO 639-1 code, e.g., "en").
    pub language: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cuesmith=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            words_per_cue: 4,
            base_cue_secs: 2.5,
            avg_word_length_divisor: 5.0,
            min_duration_multiplier: 0.8,
            max_duration_multiplier: 1.5,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            nudge_step_secs: 0.5,
            min_cue_secs: 0.1,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            model: "whisper-1".to_string(),
            api_key_env: "CUESMITH_API_KEY".to_string(),
            language: "en".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> CuesmithResult<Self> {
        if !path.exists() {
            return Err(CuesmithError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CuesmithError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject values that would make segmentation or nudging meaningless.
    pub fn validate(&self) -> CuesmithResult<()> {
        let seg = &self.segmentation;
        if seg.words_per_cue == 0 {
            return Err(CuesmithError::config("segmentation.words_per_cue must be > 0"));
        }
        if !(seg.base_cue_secs > 0.0) || !(seg.avg_word_length_divisor > 0.0) {
            return Err(CuesmithError::config(
                "segmentation.base_cue_secs and avg_word_length_divisor must be > 0",
            ));
        }
        if seg.min_duration_multiplier > seg.max_duration_multiplier {
            return Err(CuesmithError::config(
                "segmentation.min_duration_multiplier exceeds max_duration_multiplier",
            ));
        }
        if !(self.editor.nudge_step_secs > 0.0) || self.editor.min_cue_secs < 0.0 {
            return Err(CuesmithError::config(
                "editor.nudge_step_secs must be > 0 and min_cue_secs >= 0",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cuesmith").join("config.json")
}
