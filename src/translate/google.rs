//! Google Translate web endpoint (no API key).

use crate::error::{PdaError, Result};
use crate::translate::Translator;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslator {
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
}

/// The endpoint answers with nested arrays; the first element lists
/// `[translated, original, ...]` sentence pairs.
fn parse_response(body: &Value) -> Result<String> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| PdaError::Translation("Unexpected response shape".to_string()))?;

    Ok(sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        debug!(
            "Translating {} chars to {}",
            text.chars().count(),
            target_lang
        );

        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| PdaError::Translation(format!("Translation request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PdaError::Api(format!(
                "Translation API error ({}): {}",
                status, body
            )));
        }

        let json: Value = serde_json::from_str(&body)?;
        parse_response(&json)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
