//! File-transfer server launched as a blocking child process.

use crate::config::Config;
use crate::error::{PdaError, Result};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tracing::{info, warn};

static SERVER_RUNNING: AtomicBool = AtomicBool::new(false);
static INSTALL_HANDLER: Once = Once::new();

/// Install the process-wide Ctrl+C handler.
///
/// While the server child runs, Ctrl+C only stops the child (it receives the
/// signal from the terminal itself). Otherwise it exits the program.
pub fn install_interrupt_handler() {
    INSTALL_HANDLER.call_once(|| {
        let result = ctrlc::set_handler(|| {
            if SERVER_RUNNING.load(Ordering::SeqCst) {
                return;
            }
            let _ = console::Term::stdout().show_cursor();
            // chunk workspaces skipped by this exit are swept on the next start
            std::process::exit(130);
        });
        if let Err(e) = result {
            warn!("Could not install Ctrl+C handler: {e}");
        }
    });
}

/// Clears the running flag even if waiting on the child fails.
struct RunningGuard;

impl RunningGuard {
    fn enter() -> Self {
        SERVER_RUNNING.store(true, Ordering::SeqCst);
        RunningGuard
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        SERVER_RUNNING.store(false, Ordering::SeqCst);
    }
}

/// Run `config.server_command` inside the output directory until it exits.
pub fn run_file_server(config: &Config) -> Result<ExitStatus> {
    let (program, args) = config
        .server_command
        .split_first()
        .ok_or_else(|| PdaError::Config("server_command is empty".to_string()))?;

    install_interrupt_handler();
    info!(
        "Starting file server: {} (in {})",
        config.server_command.join(" "),
        config.output_dir.display()
    );

    let mut child = Command::new(program)
        .args(args)
        .current_dir(&config.output_dir)
        .spawn()
        .map_err(|e| {
            PdaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to start {program}: {e}"),
            ))
        })?;

    let _running = RunningGuard::enter();
    let status = child.wait()?;

    info!("File server exited with {}", status);
    Ok(status)
}
