//! Chunked processing of long text through size-limited services.
//!
//! Every intermediate chunk file lives in a [`ChunkWorkspace`], a temporary
//! directory removed when it is dropped. Only a hard exit skips the drop; those
//! leftovers are swept by [`remove_stale_workspaces`] on the next start.

use crate::audio::concatenate_audio_files;
use crate::error::Result;
use crate::text::wrap_chunks;
use crate::translate::Translator;
use crate::tts::Synthesizer;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const WORKSPACE_PREFIX: &str = ".pda-chunks";

/// Scoped directory owning the chunk files of one batch.
pub struct ChunkWorkspace {
    dir: TempDir,
}

impl ChunkWorkspace {
    /// Create a fresh workspace inside `parent`.
    pub fn new_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)?;
        debug!("Chunk workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to a file named `name` inside the workspace.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Delete chunk workspaces left in `dir` by a run that was interrupted before
/// they could be dropped.
pub fn remove_stale_workspaces(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_workspace = entry.file_name().to_string_lossy().starts_with(WORKSPACE_PREFIX);
        if is_workspace && entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
            removed += 1;
        }
    }

    if removed > 0 {
        info!("Removed {} stale chunk workspace(s) from {}", removed, dir.display());
    }
    Ok(removed)
}

fn chunk_progress(total: usize, show: bool, verb: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_message(verb.to_string());
    Some(pb)
}

/// Translate `text` chunk by chunk and join the results with newlines.
///
/// Chunks are at most `max_chars` characters, cut on word boundaries. The
/// first failing chunk aborts the batch.
pub async fn translate_in_chunks(
    translator: &dyn Translator,
    text: &str,
    target_lang: &str,
    max_chars: usize,
    workspace_root: &Path,
    show_progress: bool,
) -> Result<String> {
    let chunks = wrap_chunks(text, max_chars);
    let workspace = ChunkWorkspace::new_in(workspace_root)?;
    let progress = chunk_progress(chunks.len(), show_progress, "translating");

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        info!("Translating chunk {} of {}", i + 1, chunks.len());
        let translated = translator.translate(chunk, target_lang).await?;
        parts.push(workspace.write(&format!("translated_chunk_{}.txt", i + 1), translated)?);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    let mut pieces = Vec::with_capacity(parts.len());
    for part in &parts {
        pieces.push(fs::read_to_string(part)?);
    }

    if let Some(pb) = progress {
        pb.finish_with_message("translated");
    }

    Ok(pieces.join("\n"))
}

/// Synthesize `text` chunk by chunk and consolidate the audio into `output`.
///
/// Returns the number of chunks synthesized. The first failing chunk aborts
/// the batch and `output` is not written.
pub async fn synthesize_in_chunks(
    synthesizer: &dyn Synthesizer,
    text: &str,
    lang: &str,
    max_chars: usize,
    output: &Path,
    workspace_root: &Path,
    show_progress: bool,
) -> Result<usize> {
    let chunks = wrap_chunks(text, max_chars);
    let workspace = ChunkWorkspace::new_in(workspace_root)?;
    let progress = chunk_progress(chunks.len(), show_progress, "synthesizing");

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        info!("Synthesizing chunk {} of {}", i + 1, chunks.len());
        let audio = synthesizer.synthesize(chunk, lang).await?;
        parts.push(workspace.write(&format!("part_{}.mp3", i + 1), audio)?);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    concatenate_audio_files(&parts, output)?;

    if let Some(pb) = progress {
        pb.finish_with_message("synthesized");
    }
    info!("Consolidated {} part(s) into {}", parts.len(), output.display());

    Ok(parts.len())
}
