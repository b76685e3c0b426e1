//! D365 Connect
//!
//! Entry point for the interactive sign-in console.

use anyhow::Context;
use d365_connect::{
    Console, ConnectionLoop, CrlfWriter, DebugLog, LoopState, OnlineConnector, Settings,
    TerminalConsole,
};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr so they stay out of the prompts. The terminal
    // is in raw mode while prompting, so newlines need a carriage return.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(|| CrlfWriter::new(io::stderr()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_interrupted(&e) => {
            tracing::debug!("Interrupted by user");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let settings = Settings::default();
    let log = DebugLog::new(settings.debug_log, &settings.log_file);

    tracing::info!("Starting D365 Connect...");

    let mut connector =
        OnlineConnector::new(settings.clone()).context("Failed to initialise connector")?;
    let mut console = TerminalConsole::new().context("Failed to open terminal")?;

    let outcome = ConnectionLoop::new(&mut console, &mut connector, &settings, &log)
        .run()
        .context("Terminal I/O failed")?;

    if outcome.state == LoopState::Ready {
        console.write_line("\nPress any key to exit.")?;
        console.read_key(false)?;
    }

    tracing::info!(
        "Finished in state {:?} after {} attempt(s)",
        outcome.state,
        outcome.attempts
    );
    Ok(())
}

fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::Interrupted)
}
