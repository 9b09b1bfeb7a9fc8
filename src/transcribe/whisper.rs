use crate::audio::AudioChunk;
use crate::config::Config;
use crate::error::{PdaError, Result};
use crate::transcribe::{Transcriber, Transcript};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Maximum file size for Whisper API (25 MB).
const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Transcription model variants accepted by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhisperModel {
    #[default]
    #[serde(rename = "whisper-1")]
    Whisper1,
    #[serde(rename = "gpt-4o-transcribe")]
    Gpt4oTranscribe,
    #[serde(rename = "gpt-4o-mini-transcribe")]
    Gpt4oMiniTranscribe,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Whisper1 => "whisper-1",
            WhisperModel::Gpt4oTranscribe => "gpt-4o-transcribe",
            WhisperModel::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "whisper-1" => Ok(WhisperModel::Whisper1),
            "gpt-4o-transcribe" => Ok(WhisperModel::Gpt4oTranscribe),
            "gpt-4o-mini-transcribe" => Ok(WhisperModel::Gpt4oMiniTranscribe),
            _ => Err(format!(
                "Unknown transcription model: {s}. Use whisper-1, gpt-4o-transcribe or gpt-4o-mini-transcribe"
            )),
        }
    }
}

/// OpenAI Whisper API client.
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: String,
    model: WhisperModel,
    language: Option<String>,
    base_url: String,
}

impl WhisperClient {
    /// Create a new Whisper client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: WhisperModel::default(),
            language: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Client for the configured key and model. `language` pins the spoken
    /// language; `None` lets the service detect it.
    pub fn from_config(config: &Config, language: Option<&str>) -> Result<Self> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            PdaError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            )
        })?;
        let client = Self::new(api_key).with_model(config.transcription_model);
        Ok(match language {
            Some(lang) => client.with_language(lang.to_string()),
            None => client,
        })
    }

    pub fn with_model(mut self, model: WhisperModel) -> Self {
        self.model = model;
        self
    }

    /// Set the source language (ISO 639-1 code). Detected when unset.
    pub fn with_language(mut self, language: String) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn build_form(&self, audio_path: &Path) -> Result<Form> {
        let file_bytes = fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mime_type = match audio_path.extension().and_then(|e| e.to_str()) {
            Some("wav") => "audio/wav",
            Some("mp3") => "audio/mpeg",
            Some("m4a") => "audio/mp4",
            Some("flac") => "audio/flac",
            Some("ogg") => "audio/ogg",
            Some("webm") => "audio/webm",
            _ => "application/octet-stream",
        };

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_type)?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.as_str())
            .text("response_format", "verbose_json");

        if let Some(ref lang) = self.language {
            form = form.text("language", lang.clone());
        }

        Ok(form)
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<Transcript> {
        debug!(
            "Transcribing chunk {} with Whisper: {:?}",
            chunk.index, chunk.path
        );

        let form = self.build_form(&chunk.path).await?;
        let url = format!(
            "{}/v1/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Whisper API response status: {}", status);

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(PdaError::Api(format!(
                    "Whisper API error: {} ({})",
                    api_error.error.message, api_error.error.r#type
                )));
            }
            return Err(PdaError::Api(format!(
                "Whisper API error ({}): {}",
                status, body
            )));
        }

        let parsed: WhisperResponse = serde_json::from_str(&body)?;
        Ok(Transcript {
            text: parsed.text.trim().to_string(),
            language: parsed.language,
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }

    fn max_file_size(&self) -> u64 {
        MAX_FILE_SIZE
    }
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    r#type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::TimeRegion;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_whisper_model_parsing() {
        assert_eq!("whisper-1".parse::<WhisperModel>().unwrap(), WhisperModel::Whisper1);
        assert_eq!(
            "gpt-4o-mini-transcribe".parse::<WhisperModel>().unwrap(),
            WhisperModel::Gpt4oMiniTranscribe
        );
        assert!("whisper-2".parse::<WhisperModel>().is_err());
        assert_eq!(WhisperModel::Gpt4oTranscribe.to_string(), "gpt-4o-transcribe");
    }

    #[test]
    fn test_from_config_uses_model_and_language() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            transcription_model: WhisperModel::Gpt4oTranscribe,
            ..Config::default()
        };
        let client = WhisperClient::from_config(&config, Some("es")).unwrap();
        assert_eq!(client.model, WhisperModel::Gpt4oTranscribe);
        assert_eq!(client.language.as_deref(), Some("es"));

        let client = WhisperClient::from_config(&config, None).unwrap();
        assert!(client.language.is_none());
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(matches!(
            WhisperClient::from_config(&Config::default(), None),
            Err(PdaError::Config(_))
        ));
    }

    #[test]
    fn test_response_without_language() {
        let parsed: WhisperResponse = serde_json::from_str(r#"{"text": " Hola "}"#).unwrap();
        assert_eq!(parsed.text, " Hola ");
        assert!(parsed.language.is_none());
    }

    #[tokio::test]
    async fn test_missing_chunk_file() {
        let client = WhisperClient::new("test-key".to_string());
        let chunk = AudioChunk {
            region: TimeRegion {
                start: Duration::ZERO,
                end: Duration::from_secs(5),
            },
            path: PathBuf::from("/tmp/nonexistent_pda_chunk.wav"),
            index: 0,
        };
        assert!(client.transcribe(&chunk).await.is_err());
    }
}
