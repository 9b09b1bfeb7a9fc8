//! Persisting text into the working folders and bulk folder operations.

use crate::error::{PdaError, Result};
use crate::text::{split_volumes, word_count};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolve `name` inside `dir`, failing if nothing is there.
pub fn resolve_existing(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name.trim());
    if name.trim().is_empty() || !path.is_file() {
        return Err(PdaError::FileNotFound(path.display().to_string()));
    }
    Ok(path)
}

/// File stem of a user supplied name, falling back to the whole name.
pub fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Write `text` to `<dir>/<stem(name)>.txt`.
pub fn save_text(dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.txt", stem_of(name)));
    fs::write(&path, text)?;
    info!("Saved text to {}", path.display());
    Ok(path)
}

/// Write each `max_words` window of `text` to `<dir>/<stem>_volume_<n>.txt`.
pub fn save_text_in_volumes(
    dir: &Path,
    name: &str,
    text: &str,
    max_words: usize,
) -> Result<Vec<PathBuf>> {
    let stem = stem_of(name);
    let mut written = Vec::new();

    for (i, volume) in split_volumes(text, max_words).iter().enumerate() {
        let path = dir.join(format!("{}_volume_{}.txt", stem, i + 1));
        fs::write(&path, volume)?;
        info!("Saved volume {} to {}", i + 1, path.display());
        written.push(path);
    }

    Ok(written)
}

/// Save as volumes when the text has more than `max_words` words, otherwise
/// as a single file.
pub fn persist_text(dir: &Path, name: &str, text: &str, max_words: usize) -> Result<Vec<PathBuf>> {
    let words = word_count(text);
    if words > max_words {
        info!(
            "Text has {} words, splitting into volumes of {}",
            words, max_words
        );
        save_text_in_volumes(dir, name, text, max_words)
    } else {
        Ok(vec![save_text(dir, name, text)?])
    }
}

/// Move every regular file from `src` into `dest`. Subdirectories are skipped.
pub fn move_files(src: &Path, dest: &Path) -> Result<usize> {
    let mut moved = 0;

    for entry in fs::read_dir(src)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = dest.join(file_name);

        if fs::rename(&path, &target).is_err() {
            // rename fails across filesystems
            debug!("rename failed, copying {}", path.display());
            fs::copy(&path, &target)?;
            fs::remove_file(&path)?;
        }
        moved += 1;
    }

    info!(
        "Moved {} file(s) from {} to {}",
        moved,
        src.display(),
        dest.display()
    );
    Ok(moved)
}

/// Delete every regular file directly inside `dir`.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    info!("Removed {} file(s) from {}", removed, dir.display());
    Ok(removed)
}
