use crate::error::{PdaError, Result};
use crate::transcribe::whisper::WhisperModel;
use crate::translate::gemini::DEFAULT_MODEL as DEFAULT_GEMINI_MODEL;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// ISO 639-1 style code with an optional region, e.g. `es`, `pt-BR`, `zh-CN`.
static LANGUAGE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2,4})?$").expect("valid regex"));

/// Tesseract traineddata names joined with `+`, e.g. `eng`, `spa+eng`, `chi_sim`.
static OCR_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]{3,}(\+[a-z_]{3,})*$").expect("valid regex"));

/// Whether `code` looks like a language code accepted by the web services.
pub fn is_language_code(code: &str) -> bool {
    LANGUAGE_CODE.is_match(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorProvider {
    #[default]
    Google,
    Gemini,
}

impl std::fmt::Display for TranslatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslatorProvider::Google => write!(f, "google"),
            TranslatorProvider::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for TranslatorProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(TranslatorProvider::Google),
            "gemini" => Ok(TranslatorProvider::Gemini),
            _ => Err(format!("Unknown translator: {}. Use 'google' or 'gemini'", s)),
        }
    }
}

/// Runtime settings shared by every menu action.
///
/// Built once at startup and passed by reference; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Default language for speech synthesis.
    pub speech_language: String,
    /// Default target language for translation.
    pub translation_language: String,
    /// Default name of the consolidated audio file.
    pub audio_file_name: String,
    /// Tesseract language pack(s), e.g. "eng" or "spa+eng".
    pub ocr_language: String,

    /// Character budget of one translation request.
    pub translate_chunk_chars: usize,
    /// Character budget of one synthesis chunk.
    pub tts_chunk_chars: usize,
    /// Word count above which extracted text is split into volumes.
    pub volume_words: usize,
    /// How much extracted text is echoed back to the terminal.
    pub preview_chars: usize,

    pub translator: TranslatorProvider,
    /// Model used when `translator` is gemini.
    pub gemini_model: String,
    pub transcription_model: WhisperModel,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    /// Command line of the file-transfer server, run inside the output directory.
    pub server_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("pda_input"),
            output_dir: PathBuf::from("pda_output"),
            speech_language: "es".to_string(),
            translation_language: "en".to_string(),
            audio_file_name: "output.mp3".to_string(),
            ocr_language: "eng".to_string(),
            translate_chunk_chars: 5000,
            tts_chunk_chars: 4000,
            volume_words: 20000,
            preview_chars: 1000,
            translator: TranslatorProvider::default(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            transcription_model: WhisperModel::default(),
            openai_api_key: None,
            gemini_api_key: None,
            server_command: vec![
                "python3".to_string(),
                "-m".to_string(),
                "http.server".to_string(),
                "8080".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load from the user config file (or `path` when given), then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(Self::config_file_path);

        let mut config = match config_path {
            Some(ref p) if p.exists() => {
                debug!("Loading config from {}", p.display());
                let contents = std::fs::read_to_string(p)?;
                toml::from_str::<Config>(&contents)?
            }
            Some(ref p) if path.is_some() => {
                return Err(PdaError::FileNotFound(p.display().to_string()));
            }
            _ => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("PDA_INPUT_DIR") {
            self.input_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("PDA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(lang) = std::env::var("PDA_SPEECH_LANG") {
            self.speech_language = lang;
        }
        if let Ok(provider) = std::env::var("PDA_TRANSLATOR") {
            if let Ok(p) = provider.parse() {
                self.translator = p;
            }
        }
        if let Ok(model) = std::env::var("PDA_TRANSCRIPTION_MODEL") {
            match model.parse() {
                Ok(m) => self.transcription_model = m,
                Err(e) => warn!("Ignoring PDA_TRANSCRIPTION_MODEL: {e}"),
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("translate_chunk_chars", self.translate_chunk_chars),
            ("tts_chunk_chars", self.tts_chunk_chars),
            ("volume_words", self.volume_words),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(PdaError::Config(format!("{name} must be greater than 0")));
            }
        }

        for (name, value) in [
            ("speech_language", &self.speech_language),
            ("translation_language", &self.translation_language),
        ] {
            if !is_language_code(value) {
                return Err(PdaError::Config(format!(
                    "{name} '{value}' is not a language code"
                )));
            }
        }

        if !OCR_LANGUAGE.is_match(&self.ocr_language) {
            return Err(PdaError::Config(format!(
                "ocr_language '{}' is not a tesseract language",
                self.ocr_language
            )));
        }

        if self.gemini_model.trim().is_empty() {
            return Err(PdaError::Config("gemini_model must not be empty".to_string()));
        }

        if self.server_command.is_empty() {
            return Err(PdaError::Config(
                "server_command must name a program".to_string(),
            ));
        }

        if self.translator == TranslatorProvider::Gemini && self.gemini_api_key.is_none() {
            return Err(PdaError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Create the input and output directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pda-convert").join("config.toml"))
    }
}
