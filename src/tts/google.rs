//! Google Translate text-to-speech endpoint.

use crate::error::{PdaError, Result};
use crate::text::wrap_chunks_strict;
use crate::tts::Synthesizer;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://translate.google.com";

/// Longest input the endpoint accepts per request.
pub const MAX_REQUEST_CHARS: usize = 100;

/// Keyless client for Google's translate_tts endpoint.
pub struct GoogleTts {
    client: Client,
    base_url: String,
}

impl Default for GoogleTts {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTts {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_piece(&self, piece: &str, lang: &str, index: usize, total: usize) -> Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.base_url.trim_end_matches('/'));
        let idx = index.to_string();
        let total = total.to_string();
        let textlen = piece.chars().count().to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", piece),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PdaError::Synthesis(format!("TTS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PdaError::Api(format!("TTS API error ({}): {}", status, body)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Synthesizer for GoogleTts {
    /// MP3 frames from consecutive requests are concatenated directly.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>> {
        let pieces = wrap_chunks_strict(text, MAX_REQUEST_CHARS);
        if pieces.is_empty() {
            return Err(PdaError::InvalidSpeechInput("no text to speak".to_string()));
        }

        debug!("Synthesizing {} piece(s) in '{}'", pieces.len(), lang);

        let mut audio = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            audio.extend(self.fetch_piece(piece, lang, i, pieces.len()).await?);
        }

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "Google TTS"
    }
}
