use crate::config::SERVICE_DURATION_CEILING_SECS;
use crate::error::{MediascribeError, Result};
use crate::media::cut::ChunkArtifact;
use crate::transcribe::Transcriber;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// OpenAI transcription endpoint.
const TRANSCRIPTION_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Maximum upload size the API accepts (25 MB).
const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Transcription model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscribeModel {
    #[default]
    Gpt4oTranscribe,
    Gpt4oMiniTranscribe,
    Whisper1,
}

impl TranscribeModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscribeModel::Gpt4oTranscribe => "gpt-4o-transcribe",
            TranscribeModel::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
            TranscribeModel::Whisper1 => "whisper-1",
        }
    }
}

impl std::fmt::Display for TranscribeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TranscribeModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpt-4o-transcribe" => Ok(TranscribeModel::Gpt4oTranscribe),
            "gpt-4o-mini-transcribe" => Ok(TranscribeModel::Gpt4oMiniTranscribe),
            "whisper-1" => Ok(TranscribeModel::Whisper1),
            _ => Err(format!(
                "Unknown model: {}. Use 'gpt-4o-transcribe', 'gpt-4o-mini-transcribe', or 'whisper-1'",
                s
            )),
        }
    }
}

/// OpenAI speech-to-text client. One request per chunk, plain-text
/// response, no retries.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: TranscribeModel,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: TranscribeModel::default(),
            endpoint: TRANSCRIPTION_API_URL.to_string(),
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: TranscribeModel) -> Self {
        self.model = model;
        self
    }

    /// Point the client at a different endpoint (tests use a local server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the multipart form for one chunk upload.
    async fn build_form(&self, audio_path: &Path) -> Result<Form> {
        let file_bytes = fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chunk.mp3")
            .to_string();

        let mime_type = match audio_path.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("m4a") => "audio/mp4",
            Some("webm") => "audio/webm",
            _ => "application/octet-stream",
        };

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_type)?;

        Ok(Form::new()
            .part("file", file_part)
            .text("model", self.model.as_str())
            .text("response_format", "text"))
    }

    /// Make the API request. With `response_format=text` the success body is
    /// the transcript itself, not JSON.
    async fn call_api(&self, form: Form) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!("Transcription API response status: {}", status);

        if status.is_success() {
            let body = response.text().await?;
            return Ok(body.trim().to_string());
        }

        let error_body = response.text().await.unwrap_or_default();

        // Error bodies are JSON even in text mode
        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
            return Err(MediascribeError::Api(format!(
                "Transcription API error: {} ({})",
                api_error.error.message, api_error.error.r#type
            )));
        }

        Err(MediascribeError::Api(format!(
            "Transcription API error ({}): {}",
            status, error_body
        )))
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, chunk: &ChunkArtifact) -> Result<String> {
        debug!(
            "Transcribing chunk {} with {}: {:?}",
            chunk.segment_index, self.model, chunk.path
        );

        if chunk.size_bytes as usize > MAX_FILE_SIZE {
            return Err(MediascribeError::Transcription(format!(
                "File too large for the transcription API: {} bytes (max {} bytes)",
                chunk.size_bytes, MAX_FILE_SIZE
            )));
        }

        let form = self.build_form(&chunk.path).await?;
        self.call_api(form).await
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn max_chunk_duration(&self) -> Duration {
        Duration::from_secs_f64(SERVICE_DURATION_CEILING_SECS)
    }
}

// API error response types

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    r#type: String,
    #[allow(dead_code)]
    code: Option<String>,
}
