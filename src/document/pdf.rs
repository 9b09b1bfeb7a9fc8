use std::fmt::Display;
use std::panic::{self, UnwindSafe};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{PdaError, Result};
use crate::ocr::image_to_text;

/// Resolution used when rasterizing pages for OCR.
const RASTER_DPI: &str = "300";

/// Text of a PDF.
///
/// Uses the embedded text layer when there is one, otherwise renders each page
/// and runs OCR on it.
pub fn extract_text(path: &Path, ocr_language: &str) -> Result<String> {
    let layer = read_text_layer(path, |p| pdf_extract::extract_text(p));

    if !layer.trim().is_empty() {
        return Ok(layer);
    }

    info!("No text layer in {}, running OCR", path.display());
    ocr_pages(path, ocr_language)
}

/// Text layer of `path`, empty when it is missing or unreadable.
///
/// pdf-extract panics on some fonts and encodings it does not support; a panic
/// is treated like an unreadable layer.
fn read_text_layer<F, E>(path: &Path, extract: F) -> String
where
    F: FnOnce(&Path) -> std::result::Result<String, E> + UnwindSafe,
    E: Display,
{
    match panic::catch_unwind(|| extract(path)) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text layer unreadable ({e}), falling back to OCR");
            String::new()
        }
        Err(_) => {
            warn!(
                "PDF text extraction panicked on {}, falling back to OCR",
                path.display()
            );
            String::new()
        }
    }
}

/// Render every page to PNG with pdftoppm and OCR them in page order.
fn ocr_pages(path: &Path, ocr_language: &str) -> Result<String> {
    let pages_dir = TempDir::new()?;
    let prefix = pages_dir.path().join("page");

    let output = Command::new("pdftoppm")
        .args(["-r", RASTER_DPI, "-png"])
        .arg(path)
        .arg(&prefix)
        .output()
        .map_err(|e| {
            PdaError::Extraction(format!(
                "pdftoppm not found. Install poppler-utils to OCR scanned PDFs. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdaError::Extraction(format!(
            "pdftoppm failed: {}",
            stderr.trim()
        )));
    }

    let pages = rendered_pages(pages_dir.path())?;
    debug!("Rendered {} page(s)", pages.len());

    let mut text = String::new();
    for page in &pages {
        text.push_str(&image_to_text(page, ocr_language)?);
        text.push('\n');
    }

    Ok(text)
}

/// PNG files written by pdftoppm, in page order.
///
/// pdftoppm zero-pads page numbers to a common width, so name order is page order.
fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|e| e == "png"))
        .collect();
    pages.sort();
    Ok(pages)
}
