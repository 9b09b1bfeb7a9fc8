//! Integration tests for pda-convert
//!
//! These exercise the menu actions end to end against temporary input/output
//! folders, with in-process stand-ins for the network services.

mod common;

use async_trait::async_trait;
use pda_convert::actions::{self, TranscribeOutcome, TranslateOutcome};
use pda_convert::config::Config;
use pda_convert::error::{PdaError, Result};
use pda_convert::translate::Translator;
use pda_convert::tts::Synthesizer;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn test_config(root: &TempDir) -> Config {
    let config = Config {
        input_dir: root.path().join("in"),
        output_dir: root.path().join("out"),
        ..Config::default()
    };
    config.ensure_dirs().unwrap();
    config
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Uppercases its input; optionally fails on the n-th call (1-based).
struct UpperTranslator {
    calls: AtomicUsize,
    fail_on: Option<usize>,
}

impl UpperTranslator {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl Translator for UpperTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(PdaError::Translation("service unavailable".to_string()));
        }
        Ok(text.to_uppercase())
    }

    fn name(&self) -> &'static str {
        "upper"
    }
}

/// Returns the text bytes as "audio"; optionally fails on the n-th call.
struct EchoSynthesizer {
    calls: AtomicUsize,
    fail_on: Option<usize>,
}

impl EchoSynthesizer {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl Synthesizer for EchoSynthesizer {
    async fn synthesize(&self, text: &str, _lang: &str) -> Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(PdaError::Synthesis("service unavailable".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

// ============================================================================
// Directory Operation Tests
// ============================================================================

mod directory_tests {
    use super::*;

    #[test]
    fn test_move_files_unions_contents() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("a.txt"), "a").unwrap();
        fs::write(config.input_dir.join("b.pdf"), "b").unwrap();
        fs::create_dir(config.input_dir.join("nested")).unwrap();
        fs::write(config.output_dir.join("c.mp3"), "c").unwrap();

        let moved = actions::move_input_to_output(&config).unwrap();

        assert_eq!(moved, 2);
        assert_eq!(entries(&config.input_dir), vec!["nested"]);
        assert_eq!(entries(&config.output_dir), vec!["a.txt", "b.pdf", "c.mp3"]);
        assert_eq!(fs::read_to_string(config.output_dir.join("a.txt")).unwrap(), "a");
    }

    #[test]
    fn test_move_empty_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        assert_eq!(actions::move_output_to_input(&config).unwrap(), 0);
    }

    #[test]
    fn test_clear_directory_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.output_dir.join("one.mp3"), "1").unwrap();
        fs::write(config.output_dir.join("two.txt"), "2").unwrap();

        assert_eq!(actions::clear_output(&config).unwrap(), 2);
        assert!(entries(&config.output_dir).is_empty());

        assert_eq!(actions::clear_output(&config).unwrap(), 0);
        assert!(entries(&config.output_dir).is_empty());
    }
}

// ============================================================================
// Document Extraction Tests
// ============================================================================

mod document_tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_missing_file_has_no_side_effects() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);

        let result = actions::document_to_text(&config, "missing.pdf");

        assert!(matches!(result, Err(PdaError::FileNotFound(_))));
        assert!(entries(&config.input_dir).is_empty());
        assert!(entries(&config.output_dir).is_empty());
    }

    #[test]
    fn test_unsupported_type_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("deck.pptx"), "x").unwrap();

        let result = actions::document_to_text(&config, "deck.pptx");
        assert!(matches!(result, Err(PdaError::UnsupportedDocument(_))));
    }

    #[test]
    fn test_docx_round_trip() {
        use docx_rs::*;

        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);

        let mut buffer = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("El veloz murciélago")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("hindú comía feliz")))
            .build()
            .pack(&mut buffer)
            .unwrap();
        fs::write(config.input_dir.join("cuento.docx"), buffer.into_inner()).unwrap();

        let outcome = actions::document_to_text(&config, "cuento.docx").unwrap();

        assert!(outcome.text.contains("El veloz murciélago"));
        assert!(outcome.text.contains("hindú comía feliz"));
        assert_eq!(outcome.saved, vec![config.input_dir.join("cuento.txt")]);
    }

    #[test]
    fn test_pdf_text_layer_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(
            config.input_dir.join("informe.pdf"),
            common::minimal_pdf("Hola mundo desde PDF"),
        )
        .unwrap();

        let outcome = actions::document_to_text(&config, "informe.pdf").unwrap();

        assert!(outcome.text.contains("Hola"), "got {:?}", outcome.text);
        assert!(outcome.text.contains("PDF"), "got {:?}", outcome.text);
        assert_eq!(outcome.saved, vec![config.input_dir.join("informe.txt")]);
        let saved = fs::read_to_string(&outcome.saved[0]).unwrap();
        assert_eq!(saved, outcome.text);
    }

    #[test]
    fn test_epub_round_trip_in_reading_order() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        let book = common::minimal_epub(&[
            ("Capitulo uno", "Erase una vez un libro."),
            ("Capitulo dos", "Y colorin colorado."),
        ]);
        fs::write(config.input_dir.join("libro.epub"), book).unwrap();

        let outcome = actions::document_to_text(&config, "libro.epub").unwrap();
        let text = &outcome.text;

        let first = text.find("Erase una vez").expect("first chapter");
        let second = text.find("colorin colorado").expect("second chapter");
        assert!(first < second);
        assert!(!text.contains("<p>"));
        assert_eq!(outcome.saved, vec![config.input_dir.join("libro.txt")]);
    }

    #[test]
    fn test_long_text_split_into_volumes() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        let text = (1..=25000)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(config.input_dir.join("big.txt"), &text).unwrap();

        let outcome = actions::document_to_text(&config, "big.txt").unwrap();

        assert_eq!(outcome.saved.len(), 2);
        let first = fs::read_to_string(config.input_dir.join("big_volume_1.txt")).unwrap();
        let second = fs::read_to_string(config.input_dir.join("big_volume_2.txt")).unwrap();
        assert_eq!(first.split_whitespace().count(), 20000);
        assert_eq!(second.split_whitespace().count(), 5000);
        assert!(second.starts_with("word20001 "));

        let rejoined = format!("{first} {second}");
        assert_eq!(rejoined, text);
    }
}

// ============================================================================
// Translation Tests
// ============================================================================

mod translation_tests {
    use super::*;

    #[tokio::test]
    async fn test_short_text_single_call() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("nota.txt"), "hola mundo").unwrap();
        let translator = UpperTranslator::new(None);

        let outcome = actions::translate_file(&config, &translator, "nota.txt", "en", false)
            .await
            .unwrap();

        match outcome {
            TranslateOutcome::Translated {
                text,
                saved,
                chunked,
            } => {
                assert_eq!(text, "HOLA MUNDO");
                assert!(!chunked);
                assert_eq!(saved, config.input_dir.join("nota_translated_en.txt"));
            }
            TranslateOutcome::Empty => panic!("expected a translation"),
        }
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_long_text_chunked_in_order() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            translate_chunk_chars: 20,
            ..test_config(&root)
        };
        fs::write(
            config.input_dir.join("long.txt"),
            "uno dos tres cuatro cinco seis siete ocho nueve diez",
        )
        .unwrap();
        let translator = UpperTranslator::new(None);

        let outcome = actions::translate_file(&config, &translator, "long.txt", "en", false)
            .await
            .unwrap();

        let TranslateOutcome::Translated { text, chunked, .. } = outcome else {
            panic!("expected a translation");
        };
        assert!(chunked);
        assert_eq!(
            text,
            "UNO DOS TRES CUATRO\nCINCO SEIS SIETE\nOCHO NUEVE DIEZ"
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 3);
        // chunk workspace is gone
        assert!(entries(&config.output_dir).is_empty());
    }

    #[tokio::test]
    async fn test_mid_batch_failure_leaves_no_chunk_files() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            translate_chunk_chars: 10,
            ..test_config(&root)
        };
        fs::write(
            config.input_dir.join("long.txt"),
            "alpha beta gamma delta epsilon zeta eta theta",
        )
        .unwrap();
        let translator = UpperTranslator::new(Some(2));

        let result = actions::translate_file(&config, &translator, "long.txt", "en", false).await;

        assert!(matches!(result, Err(PdaError::Translation(_))));
        assert!(entries(&config.output_dir).is_empty());
        assert_eq!(entries(&config.input_dir), vec!["long.txt"]);
    }

    #[test]
    fn test_empty_file() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("empty.txt"), "").unwrap();
        let translator = UpperTranslator::new(None);

        let outcome = tokio_test::block_on(actions::translate_file(
            &config,
            &translator,
            "empty.txt",
            "en",
            false,
        ))
        .unwrap();

        assert!(matches!(outcome, TranslateOutcome::Empty));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_file_over_limit_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            translate_chunk_chars: 20,
            ..test_config(&root)
        };
        fs::write(config.input_dir.join("blank.txt"), " \n\t".repeat(40)).unwrap();
        let translator = UpperTranslator::new(None);

        let outcome = actions::translate_file(&config, &translator, "blank.txt", "en", false)
            .await
            .unwrap();

        assert!(matches!(outcome, TranslateOutcome::Empty));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(entries(&config.input_dir), vec!["blank.txt"]);
        assert!(entries(&config.output_dir).is_empty());
    }
}

// ============================================================================
// Transcription Tests
// ============================================================================

mod transcription_tests {
    use super::*;
    use pda_convert::audio::{check_ffmpeg, check_ffprobe, AudioChunk};
    use pda_convert::transcribe::{Transcriber, Transcript};
    use std::process::Command;

    /// Returns a fixed text for every chunk.
    struct FixedTranscriber {
        text: &'static str,
        max_file_size: u64,
        calls: AtomicUsize,
    }

    impl FixedTranscriber {
        fn new(text: &'static str, max_file_size: u64) -> Self {
            Self {
                text,
                max_file_size,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _chunk: &AudioChunk) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Transcript {
                text: self.text.to_string(),
                language: Some("spanish".to_string()),
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn max_file_size(&self) -> u64 {
            self.max_file_size
        }
    }

    /// Write two seconds of silence to `path`; false when ffmpeg can't.
    fn write_silence(path: &Path) -> bool {
        if check_ffmpeg().is_err() || check_ffprobe().is_err() {
            return false;
        }
        Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "lavfi"])
            .args(["-i", "anullsrc=r=16000:cl=mono", "-t", "2"])
            .arg(path)
            .status()
            .is_ok_and(|s| s.success())
    }

    #[tokio::test]
    async fn test_transcript_saved_with_language() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        if !write_silence(&config.input_dir.join("nota.wav")) {
            eprintln!("Skipping test: FFmpeg not installed");
            return;
        }
        let transcriber = FixedTranscriber::new("hola a todos", u64::MAX);

        let outcome = actions::transcribe_media(&config, &transcriber, "nota.wav", false)
            .await
            .unwrap();

        let TranscribeOutcome::Transcribed {
            text,
            saved,
            language,
        } = outcome
        else {
            panic!("expected a transcript");
        };
        assert_eq!(text, "hola a todos");
        assert_eq!(language.as_deref(), Some("spanish"));
        assert_eq!(saved, vec![config.input_dir.join("nota_transcript.txt")]);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nothing_recognized_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        if !write_silence(&config.input_dir.join("silencio.wav")) {
            eprintln!("Skipping test: FFmpeg not installed");
            return;
        }
        let transcriber = FixedTranscriber::new("  ", u64::MAX);

        let outcome = actions::transcribe_media(&config, &transcriber, "silencio.wav", false)
            .await
            .unwrap();

        assert!(matches!(outcome, TranscribeOutcome::Empty));
        assert_eq!(entries(&config.input_dir), vec!["silencio.wav"]);
    }

    #[tokio::test]
    async fn test_oversized_chunk_rejected_before_upload() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        if !write_silence(&config.input_dir.join("largo.wav")) {
            eprintln!("Skipping test: FFmpeg not installed");
            return;
        }
        let transcriber = FixedTranscriber::new("hola", 16);

        let result = actions::transcribe_media(&config, &transcriber, "largo.wav", false).await;

        assert!(matches!(result, Err(PdaError::Transcription(_))));
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
        assert_eq!(entries(&config.input_dir), vec!["largo.wav"]);
    }
}

// ============================================================================
// Speech Synthesis Tests
// ============================================================================

mod speech_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_chunk_speech() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("cuento.txt"), "hola mundo").unwrap();
        let synth = EchoSynthesizer::new(None);

        let outcome = actions::text_to_speech(&config, &synth, "cuento.txt", "cuento.mp3", "es", false)
            .await
            .unwrap();

        assert_eq!(outcome.chunks, 1);
        assert_eq!(outcome.output, config.output_dir.join("cuento.mp3"));
        assert_eq!(fs::read(&outcome.output).unwrap(), b"hola mundo");
        // source text is consumed, no chunk files remain
        assert!(entries(&config.input_dir).is_empty());
        assert_eq!(entries(&config.output_dir), vec!["cuento.mp3"]);
    }

    #[tokio::test]
    async fn test_invalid_language_keeps_source() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("cuento.txt"), "hola").unwrap();
        let synth = EchoSynthesizer::new(None);

        let result =
            actions::text_to_speech(&config, &synth, "cuento.txt", "out.mp3", "klingon", false).await;

        assert!(matches!(result, Err(PdaError::InvalidSpeechInput(_))));
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(entries(&config.input_dir), vec!["cuento.txt"]);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(&root);
        fs::write(config.input_dir.join("blank.txt"), "  \n").unwrap();
        let synth = EchoSynthesizer::new(None);

        let result =
            actions::text_to_speech(&config, &synth, "blank.txt", "out.mp3", "es", false).await;
        assert!(matches!(result, Err(PdaError::InvalidSpeechInput(_))));
    }

    #[tokio::test]
    async fn test_mid_batch_failure_leaves_no_parts() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            tts_chunk_chars: 6,
            ..test_config(&root)
        };
        fs::write(config.input_dir.join("cuento.txt"), "uno dos tres cuatro").unwrap();
        let synth = EchoSynthesizer::new(Some(2));

        let result =
            actions::text_to_speech(&config, &synth, "cuento.txt", "out.mp3", "es", false).await;

        assert!(matches!(result, Err(PdaError::Synthesis(_))));
        assert!(entries(&config.output_dir).is_empty());
        assert_eq!(entries(&config.input_dir), vec!["cuento.txt"]);
    }
}
