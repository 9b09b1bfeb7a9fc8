pub mod gemini;
pub mod google;

pub use gemini::GeminiTranslator;
pub use google::GoogleTranslator;

use crate::config::{Config, TranslatorProvider};
use crate::error::Result;
use async_trait::async_trait;

/// Machine translation backend. Source language is always auto-detected.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Build the translator selected in the config.
pub fn create_translator(config: &Config) -> Result<Box<dyn Translator>> {
    match config.translator {
        TranslatorProvider::Google => Ok(Box::new(GoogleTranslator::new())),
        TranslatorProvider::Gemini => Ok(Box::new(GeminiTranslator::from_config(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_translator() {
        let translator = create_translator(&Config::default()).unwrap();
        assert_eq!(translator.name(), "google");
    }

    #[test]
    fn test_create_gemini_translator_missing_key() {
        let config = Config {
            translator: TranslatorProvider::Gemini,
            ..Config::default()
        };
        assert!(create_translator(&config).is_err());
    }

    #[test]
    fn test_create_gemini_translator() {
        let config = Config {
            translator: TranslatorProvider::Gemini,
            gemini_api_key: Some("test-key".to_string()),
            ..Config::default()
        };
        assert_eq!(create_translator(&config).unwrap().name(), "gemini");
    }
}
