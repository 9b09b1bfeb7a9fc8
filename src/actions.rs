//! The operations behind each menu entry.
//!
//! Every action takes the startup [`Config`] explicitly and resolves user
//! supplied names against the input directory before doing any work, so a
//! missing file never has side effects.

use crate::audio::{create_chunks, extract_audio, plan_fixed_chunks, TRANSCRIPTION_CHUNK};
use crate::batch::{synthesize_in_chunks, translate_in_chunks};
use crate::config::Config;
use crate::document;
use crate::error::{PdaError, Result};
use crate::ocr;
use crate::storage::{
    clear_directory, move_files, persist_text, resolve_existing, save_text, stem_of,
};
use crate::transcribe::Transcriber;
use crate::translate::Translator;
use crate::tts::{validate_speech_input, Synthesizer};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

/// Text produced by an action and the files it was saved to.
#[derive(Debug)]
pub struct TextOutcome {
    pub text: String,
    pub saved: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct SpeechOutcome {
    pub output: PathBuf,
    pub chunks: usize,
    pub removed_source: PathBuf,
}

#[derive(Debug)]
pub enum TranscribeOutcome {
    /// Nothing was recognized, so no transcript was written.
    Empty,
    Transcribed {
        text: String,
        saved: Vec<PathBuf>,
        /// Language reported for the first chunk that had one.
        language: Option<String>,
    },
}

#[derive(Debug)]
pub enum TranslateOutcome {
    /// The source file had no text.
    Empty,
    Translated { text: String, saved: PathBuf, chunked: bool },
}

/// Extract text from a PDF/DOCX/EPUB/plain-text file in the input directory.
///
/// Long results are split into volumes of `config.volume_words` words.
pub fn document_to_text(config: &Config, name: &str) -> Result<TextOutcome> {
    let path = resolve_existing(&config.input_dir, name)?;
    let text = document::extract_text(&path, config)?;
    let saved = persist_text(&config.input_dir, name, &text, config.volume_words)?;
    Ok(TextOutcome { text, saved })
}

/// OCR an image from the input directory into `<stem>.txt`.
pub fn image_to_text(config: &Config, name: &str) -> Result<TextOutcome> {
    let path = resolve_existing(&config.input_dir, name)?;
    let text = ocr::image_to_text(&path, &config.ocr_language)?;
    let saved = vec![save_text(&config.input_dir, name, &text)?];
    Ok(TextOutcome { text, saved })
}

/// Speak a text file from the input directory into `output/<output_name>`.
///
/// The source text file is deleted once the audio has been written.
pub async fn text_to_speech(
    config: &Config,
    synthesizer: &dyn Synthesizer,
    name: &str,
    output_name: &str,
    lang: &str,
    show_progress: bool,
) -> Result<SpeechOutcome> {
    let source = resolve_existing(&config.input_dir, name)?;
    let text = fs::read_to_string(&source)?;
    validate_speech_input(&text, lang)?;

    let output = config.output_path(output_name);
    info!(
        "Speaking {} in '{}' with {}",
        source.display(),
        lang,
        synthesizer.name()
    );

    let chunks = synthesize_in_chunks(
        synthesizer,
        &text,
        lang,
        config.tts_chunk_chars,
        &output,
        &config.output_dir,
        show_progress,
    )
    .await?;

    fs::remove_file(&source)?;
    info!("Removed source text {}", source.display());

    Ok(SpeechOutcome {
        output,
        chunks,
        removed_source: source,
    })
}

/// Translate a text file from the input directory into
/// `<stem>_translated_<lang>.txt`.
pub async fn translate_file(
    config: &Config,
    translator: &dyn Translator,
    name: &str,
    target_lang: &str,
    show_progress: bool,
) -> Result<TranslateOutcome> {
    let path = resolve_existing(&config.input_dir, name)?;
    let text = fs::read_to_string(&path)?;

    if text.trim().is_empty() {
        return Ok(TranslateOutcome::Empty);
    }

    let chunked = text.chars().count() > config.translate_chunk_chars;
    let translated = if chunked {
        info!(
            "Text exceeds {} characters, translating in chunks",
            config.translate_chunk_chars
        );
        translate_in_chunks(
            translator,
            &text,
            target_lang,
            config.translate_chunk_chars,
            &config.output_dir,
            show_progress,
        )
        .await?
    } else {
        translator.translate(&text, target_lang).await?
    };

    let out_name = format!("{}_translated_{}.txt", stem_of(name), target_lang);
    let saved = save_text(&config.input_dir, &out_name, &translated)?;

    Ok(TranslateOutcome::Translated {
        text: translated,
        saved,
        chunked,
    })
}

/// Transcribe an audio or video file from the input directory into
/// `<stem>_transcript.txt` (volumes when long).
pub async fn transcribe_media(
    config: &Config,
    transcriber: &dyn Transcriber,
    name: &str,
    show_progress: bool,
) -> Result<TranscribeOutcome> {
    let source = resolve_existing(&config.input_dir, name)?;
    let work_dir = TempDir::new()?;
    debug!("Using temp directory: {:?}", work_dir.path());

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Extracting audio...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let audio_path = work_dir.path().join("audio.wav");
    let duration = extract_audio(&source, &audio_path).await?;
    let regions = plan_fixed_chunks(duration, TRANSCRIPTION_CHUNK);
    let chunks = create_chunks(&audio_path, &regions, work_dir.path()).await?;

    let mut texts = Vec::with_capacity(chunks.len());
    let mut language = None;
    for chunk in &chunks {
        let size = fs::metadata(&chunk.path)?.len();
        if size > transcriber.max_file_size() {
            return Err(PdaError::Transcription(format!(
                "Chunk {} ({}) is {} bytes, {} accepts at most {}",
                chunk.index + 1,
                chunk.region,
                size,
                transcriber.name(),
                transcriber.max_file_size()
            )));
        }

        info!("Transcribing chunk {} ({})", chunk.index + 1, chunk.region);
        if let Some(pb) = &spinner {
            pb.set_message(format!(
                "Transcribing chunk {}/{} [{}] with {}...",
                chunk.index + 1,
                chunks.len(),
                chunk.region,
                transcriber.name()
            ));
        }
        let transcript = transcriber.transcribe(chunk).await?;
        if language.is_none() {
            language = transcript.language;
        }
        texts.push(transcript.text);
    }

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("✓ Transcribed {} chunk(s)", chunks.len()));
    }

    let text = texts.join("\n");
    if text.trim().is_empty() {
        info!("No speech recognized in {}", source.display());
        return Ok(TranscribeOutcome::Empty);
    }

    let out_name = format!("{}_transcript.txt", stem_of(name));
    let saved = persist_text(&config.input_dir, &out_name, &text, config.volume_words)?;

    Ok(TranscribeOutcome::Transcribed {
        text,
        saved,
        language,
    })
}

pub fn move_output_to_input(config: &Config) -> Result<usize> {
    move_files(&config.output_dir, &config.input_dir)
}

pub fn move_input_to_output(config: &Config) -> Result<usize> {
    move_files(&config.input_dir, &config.output_dir)
}

pub fn clear_input(config: &Config) -> Result<usize> {
    clear_directory(&config.input_dir)
}

pub fn clear_output(config: &Config) -> Result<usize> {
    clear_directory(&config.output_dir)
}
