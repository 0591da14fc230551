//! Hosted transcription.
//!
//! The provider takes raw audio bytes plus a language hint and answers with
//! a single plain-text transcript. It returns no timestamps; timing comes
//! from [`crate::segmentation`].

use std::path::Path;
use std::time::Duration;

use cuesmith_common::config::TranscriptionConfig;
use cuesmith_common::error::{CuesmithError, CuesmithResult};
use serde::{Deserialize, Serialize};

/// An uploaded audio file, validated by declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl AudioUpload {
    /// Accept an upload only if its declared media type is `audio/*`.
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> CuesmithResult<Self> {
        let file_name = file_name.into();
        let media_type = media_type.into();
        if !is_audio_media_type(&media_type) {
            return Err(CuesmithError::invalid_input(format!(
                "{file_name} is not an audio file (declared type '{media_type}')"
            )));
        }
        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }

    /// Read an audio file from disk, deriving its media type from the extension.
    pub fn from_path(path: &Path) -> CuesmithResult<Self> {
        if !path.exists() {
            return Err(CuesmithError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let media_type = media_type_for_path(path).unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path)?;
        Self::new(file_name, media_type, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn is_audio_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("audio/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Media type for common audio file extensions.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" | "mp4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "weba" => "audio/webm",
        _ => return None,
    };
    Some(media_type)
}

/// One transcription call.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: AudioUpload,

    /// Language hint (ISO 639-1 code, e.g., "en").
    pub language: String,
}

/// Provider answer: the whole transcript as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// A speech-to-text service.
#[async_trait::async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the uploaded audio. Any failure is reported as
    /// [`CuesmithError::Transcription`]; there are no partial results.
    async fn transcribe(&self, request: &TranscriptionRequest) -> CuesmithResult<Transcript>;
}

/// Client for an OpenAI-compatible `audio/transcriptions` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpTranscriber {
    /// Build a client from config. The API key is read from the environment
    /// variable named by `config.api_key_env`.
    pub fn from_config(config: &TranscriptionConfig) -> CuesmithResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            CuesmithError::config(format!(
                "environment variable {} with the transcription API key is not set",
                config.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| CuesmithError::config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl TranscriptionProvider for HttpTranscriber {
    async fn transcribe(&self, request: &TranscriptionRequest) -> CuesmithResult<Transcript> {
        tracing::info!(
            file = request.audio.file_name(),
            bytes = request.audio.bytes().len(),
            language = %request.language,
            model = %self.model,
            "Starting transcription"
        );

        let part = reqwest::multipart::Part::bytes(request.audio.bytes().to_vec())
            .file_name(request.audio.file_name().to_string())
            .mime_str(request.audio.media_type())
            .map_err(|e| CuesmithError::transcription(format!("invalid media type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", request.language.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CuesmithError::transcription(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Transcription service rejected the request");
            return Err(CuesmithError::transcription(format!(
                "service answered {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let transcript: Transcript = response
            .json()
            .await
            .map_err(|e| CuesmithError::transcription(format!("unreadable response: {e}")))?;

        tracing::info!(chars = transcript.text.len(), "Transcription complete");
        Ok(transcript)
    }
}
