use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdaError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedDocument(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("Invalid language or empty text: {0}")]
    InvalidSpeechInput(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Audio processing failed: {0}")]
    AudioProcessing(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PdaError>;
