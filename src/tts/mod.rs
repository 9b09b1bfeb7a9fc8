pub mod google;

pub use google::GoogleTts;

use crate::error::{PdaError, Result};
use async_trait::async_trait;

/// Speech synthesis backend producing MP3 audio.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>>;
    fn name(&self) -> &'static str;
}

/// Language codes the synthesis service accepts.
pub const SPEECH_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et",
    "eu", "fi", "fr", "fr-CA", "gl", "gu", "ha", "hi", "hr", "hu", "id", "is", "it", "iw", "ja",
    "jw", "km", "kn", "ko", "la", "lt", "lv", "ml", "mr", "ms", "my", "ne", "nl", "no", "pa",
    "pl", "pt", "pt-PT", "ro", "ru", "si", "sk", "sq", "sr", "su", "sv", "sw", "ta", "te", "th",
    "tl", "tr", "uk", "ur", "vi", "yue", "zh", "zh-CN", "zh-TW",
];

/// Reject empty text or a language the service does not speak.
pub fn validate_speech_input(text: &str, lang: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(PdaError::InvalidSpeechInput("no text to speak".to_string()));
    }
    if !SPEECH_LANGUAGES.contains(&lang) {
        return Err(PdaError::InvalidSpeechInput(format!(
            "unsupported language '{lang}'"
        )));
    }
    Ok(())
}
