use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{PdaError, Result};

/// Image extensions accepted for OCR (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Check if Tesseract is installed and accessible.
pub fn check_tesseract() -> Result<()> {
    let output = Command::new("tesseract")
        .arg("--version")
        .output()
        .map_err(|e| {
            PdaError::Ocr(format!(
                "Tesseract not found. Please install tesseract-ocr and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(PdaError::Ocr("Tesseract check failed".to_string()));
    }

    debug!("Tesseract is available");
    Ok(())
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recognize the text in an image file.
///
/// `language` names Tesseract language packs, such as "eng" or "spa+eng".
pub fn image_to_text(path: &Path, language: &str) -> Result<String> {
    if !path.exists() {
        return Err(PdaError::FileNotFound(path.display().to_string()));
    }
    if !is_image(path) {
        return Err(PdaError::UnsupportedDocument(path.display().to_string()));
    }

    check_tesseract()?;
    info!("Running OCR on {}", path.display());

    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .args(["-l", language])
        .output()
        .map_err(|e| PdaError::Ocr(format!("Failed to run Tesseract: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdaError::Ocr(format!("Tesseract failed: {}", stderr.trim())));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
