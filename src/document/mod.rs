//! Document kinds and their text extraction strategies.

pub mod docx;
pub mod epub;
pub mod pdf;

use crate::config::Config;
use crate::error::{PdaError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Extensions read as plain UTF-8 text.
const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "csv"];

/// Supported document formats, each with its own extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Epub,
    PlainText,
}

impl DocumentKind {
    /// Pick the kind from the file extension.
    ///
    /// Matching is exact and case-sensitive, checked in the order
    /// pdf, docx, epub, plain text.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "epub" => Ok(DocumentKind::Epub),
            e if PLAIN_TEXT_EXTENSIONS.contains(&e) => Ok(DocumentKind::PlainText),
            _ => Err(PdaError::UnsupportedDocument(path.display().to_string())),
        }
    }

    pub fn extract(self, path: &Path, config: &Config) -> Result<String> {
        match self {
            DocumentKind::Pdf => pdf::extract_text(path, &config.ocr_language),
            DocumentKind::Docx => docx::extract_text(path),
            DocumentKind::Epub => epub::extract_text(path),
            DocumentKind::PlainText => {
                let bytes = std::fs::read(path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Docx => write!(f, "DOCX"),
            DocumentKind::Epub => write!(f, "EPUB"),
            DocumentKind::PlainText => write!(f, "text"),
        }
    }
}

/// Extract the full text of a supported document.
pub fn extract_text(path: &Path, config: &Config) -> Result<String> {
    if !path.exists() {
        return Err(PdaError::FileNotFound(path.display().to_string()));
    }

    let kind = DocumentKind::from_path(path)?;
    info!("Extracting {} text from {}", kind, path.display());

    let text = kind.extract(path, config)?;
    debug!("Extracted {} characters", text.len());
    Ok(text)
}
