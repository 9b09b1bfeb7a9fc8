use anyhow::{Context, Result};
use clap::Parser;
use pda_convert::config::Config;
use pda_convert::{batch, interactive, server};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pda-convert")]
#[command(version, about = "Document, image, speech and translation converter")]
#[command(
    long_about = "Interactive menu for converting files between an input and an output folder: \
document and image text extraction, text to speech, translation and transcription."
)]
struct Cli {
    /// Config file (defaults to ~/.config/pda-convert/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    config
        .ensure_dirs()
        .context("Failed to create input/output directories")?;
    batch::remove_stale_workspaces(&config.output_dir)
        .context("Failed to clean up leftover chunk files")?;

    debug!("Input:  {}", config.input_dir.display());
    debug!("Output: {}", config.output_dir.display());
    debug!("Translator: {}", config.translator);

    server::install_interrupt_handler();
    interactive::run(&config).await
}
