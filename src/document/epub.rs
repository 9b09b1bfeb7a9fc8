use crate::error::{PdaError, Result};
use std::path::Path;
use tracing::debug;

/// Text of every spine document in reading order, one newline between them.
pub fn extract_text(path: &Path) -> Result<String> {
    let mut doc = epub::doc::EpubDoc::new(path)
        .map_err(|e| PdaError::Extraction(format!("Failed to open EPUB: {e}")))?;

    let spine = doc.spine.clone();
    let mut text = String::new();

    for spine_item in spine.iter() {
        let Some((content, _mime)) = doc.get_resource(&spine_item.idref) else {
            debug!("Spine item {} has no resource", spine_item.idref);
            continue;
        };

        let html = String::from_utf8_lossy(&content);
        text.push_str(&html_to_text(&html));
        text.push('\n');
    }

    Ok(text)
}

fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 1000)
}
