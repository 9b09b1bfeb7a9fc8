use crate::actions::{self, TranscribeOutcome, TranslateOutcome};
use crate::config::Config;
use crate::error::PdaError;
use crate::server::run_file_server;
use crate::text::preview;
use crate::transcribe::create_transcriber;
use crate::translate::create_translator;
use crate::tts::GoogleTts;
use anyhow::Context;
use console::{style, Term};
use dialoguer::Input;
use std::path::PathBuf;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    DocumentToText,
    ImageToText,
    TextToSpeech,
    TranslateText,
    TranscribeMedia,
    FileServer,
    MoveOutputToInput,
    MoveInputToOutput,
    ClearInput,
    ClearOutput,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 11] = [
        MenuChoice::DocumentToText,
        MenuChoice::ImageToText,
        MenuChoice::TextToSpeech,
        MenuChoice::TranslateText,
        MenuChoice::TranscribeMedia,
        MenuChoice::FileServer,
        MenuChoice::MoveOutputToInput,
        MenuChoice::MoveInputToOutput,
        MenuChoice::ClearInput,
        MenuChoice::ClearOutput,
        MenuChoice::Exit,
    ];

    /// Parse the number typed at the prompt (1-based).
    pub fn from_input(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    fn label(self, config: &Config) -> String {
        let input = config.input_dir.display();
        let output = config.output_dir.display();
        match self {
            MenuChoice::DocumentToText => "File to text (PDF, DOCX, EPUB, TXT)".to_string(),
            MenuChoice::ImageToText => "Image to text (OCR)".to_string(),
            MenuChoice::TextToSpeech => "Text to speech (multi-language TTS)".to_string(),
            MenuChoice::TranslateText => "Translate text file".to_string(),
            MenuChoice::TranscribeMedia => "Transcribe audio/video to text".to_string(),
            MenuChoice::FileServer => "Start HTTP file-transfer server".to_string(),
            MenuChoice::MoveOutputToInput => format!("Move files from '{output}' to '{input}'"),
            MenuChoice::MoveInputToOutput => format!("Move files from '{input}' to '{output}'"),
            MenuChoice::ClearInput => format!("Delete all files in '{input}'"),
            MenuChoice::ClearOutput => format!("Delete all files in '{output}'"),
            MenuChoice::Exit => "Exit".to_string(),
        }
    }
}

/// Run the menu until the user picks Exit.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let term = Term::stdout();

    loop {
        term.clear_screen()?;
        print_menu(config);

        let input: String = Input::new()
            .with_prompt("Select an option")
            .allow_empty(true)
            .interact_text()?;

        let Some(choice) = MenuChoice::from_input(&input) else {
            println!("{} Invalid option.", style("✗").red());
            pause(&term)?;
            continue;
        };

        if choice == MenuChoice::Exit {
            println!("Exiting.");
            return Ok(());
        }

        if let Err(e) = dispatch(choice, config).await {
            report_error(&e);
        }
        pause(&term)?;
    }
}

fn print_menu(config: &Config) {
    println!("{}", style("═══ PDA CONVERTER ═══").cyan().bold());
    println!();
    for (i, choice) in MenuChoice::ALL.iter().enumerate() {
        println!("{:>3}. {}", i + 1, choice.label(config));
    }
    println!();
}

fn pause(term: &Term) -> anyhow::Result<()> {
    println!("\nPress ENTER to continue...");
    term.read_line()?;
    Ok(())
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<PdaError>() {
        Some(PdaError::FileNotFound(path)) => {
            println!("{} File not found: {}", style("✗").red(), path);
        }
        Some(PdaError::InvalidSpeechInput(reason)) => {
            println!(
                "{} Invalid language or empty text ({}).",
                style("✗").red(),
                reason
            );
        }
        _ => println!("{} Error: {:#}", style("✗").red(), error),
    }
}

fn ask(prompt: &str) -> anyhow::Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn ask_with_default(prompt: &str, default: &str) -> anyhow::Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn print_saved(paths: &[PathBuf]) {
    for path in paths {
        println!("{} Text saved to {}", style("✓").green(), style(path.display()).cyan());
    }
}

async fn dispatch(choice: MenuChoice, config: &Config) -> anyhow::Result<()> {
    let input_dir = config.input_dir.display().to_string();

    match choice {
        MenuChoice::DocumentToText => {
            let name = ask(&format!("File name (PDF/DOCX/EPUB/TXT) in '{input_dir}'"))?;
            let outcome = actions::document_to_text(config, &name)?;
            println!("\n{}\n", style("Extracted text:").bold());
            println!("{}\n...", preview(&outcome.text, config.preview_chars));
            if outcome.saved.len() > 1 {
                println!(
                    "Text split into {} volumes of {} words.",
                    outcome.saved.len(),
                    config.volume_words
                );
            }
            print_saved(&outcome.saved);
        }
        MenuChoice::ImageToText => {
            let name = ask(&format!("Image name (JPG/PNG) in '{input_dir}'"))?;
            let outcome = actions::image_to_text(config, &name)?;
            println!("\n{}\n", style("OCR text:").bold());
            println!("{}", outcome.text);
            print_saved(&outcome.saved);
        }
        MenuChoice::TextToSpeech => {
            let name = ask(&format!("Text file to speak in '{input_dir}'"))?;
            let output_name = ask_with_default("Audio file name", &config.audio_file_name)?;
            let lang = ask_with_default("Language (e.g. es, en, fr, de)", &config.speech_language)?;

            println!("Processing {name}, splitting into chunks...");
            let outcome =
                actions::text_to_speech(config, &GoogleTts::new(), &name, &output_name, &lang, true)
                    .await?;
            println!(
                "{} Consolidated audio ({} chunk(s)) saved to {}",
                style("✓").green(),
                outcome.chunks,
                style(outcome.output.display()).cyan()
            );
            println!("Removed text file {}", outcome.removed_source.display());
        }
        MenuChoice::TranslateText => {
            let name = ask(&format!("Text file name in '{input_dir}'"))?;
            let lang = ask_with_default(
                "Target language (e.g. en, es, fr)",
                &config.translation_language,
            )?;
            let translator = create_translator(config)?;

            match actions::translate_file(config, translator.as_ref(), &name, &lang, true).await? {
                TranslateOutcome::Empty => println!("The file is empty."),
                TranslateOutcome::Translated { text, saved, .. } => {
                    println!("\n{} [{}]:\n", style("Translated text").bold(), lang);
                    println!("{}...\n", preview(&text, config.preview_chars));
                    print_saved(&[saved]);
                }
            }
        }
        MenuChoice::TranscribeMedia => {
            let name = ask(&format!("Audio/video file name in '{input_dir}'"))?;
            let lang = ask("Spoken language (blank to detect)")?;
            let language = (!lang.is_empty()).then_some(lang.as_str());
            let transcriber = create_transcriber(config, language)?;

            match actions::transcribe_media(config, transcriber.as_ref(), &name, true).await? {
                TranscribeOutcome::Empty => println!("No speech was recognized."),
                TranscribeOutcome::Transcribed {
                    text,
                    saved,
                    language,
                } => {
                    if let Some(language) = language {
                        println!("Detected language: {}", style(language).cyan());
                    }
                    println!("\n{}\n", style("Transcript:").bold());
                    println!("{}\n...", preview(&text, config.preview_chars));
                    print_saved(&saved);
                }
            }
        }
        MenuChoice::FileServer => {
            println!(
                "Starting file server: {} (Ctrl+C to stop)",
                config.server_command.join(" ")
            );
            let status = run_file_server(config).context("Failed to start the file server")?;
            println!("File server stopped ({status}).");
        }
        MenuChoice::MoveOutputToInput => {
            let moved = actions::move_output_to_input(config)?;
            println!(
                "{} Moved {} file(s) from {} to {}",
                style("✓").green(),
                moved,
                config.output_dir.display(),
                config.input_dir.display()
            );
        }
        MenuChoice::MoveInputToOutput => {
            let moved = actions::move_input_to_output(config)?;
            println!(
                "{} Moved {} file(s) from {} to {}",
                style("✓").green(),
                moved,
                config.input_dir.display(),
                config.output_dir.display()
            );
        }
        MenuChoice::ClearInput => {
            let removed = actions::clear_input(config)?;
            println!(
                "{} Deleted {} file(s) from {}",
                style("✓").green(),
                removed,
                config.input_dir.display()
            );
        }
        MenuChoice::ClearOutput => {
            let removed = actions::clear_output(config)?;
            println!(
                "{} Deleted {} file(s) from {}",
                style("✓").green(),
                removed,
                config.output_dir.display()
            );
        }
        MenuChoice::Exit => {}
    }

    Ok(())
}
