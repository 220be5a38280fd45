//! mixer-editor: settings editor and helper launcher for the slider mixer.
//!
//! Reads and writes the helper's `config.yaml` (slider mappings, serial port,
//! baud rate, inversion, noise reduction) and starts or stops the helper
//! process.  See [`mixer_editor::cli`] for commands and environment variables.
//!
//! Logging goes to stderr so `--json` output on stdout stays parseable.  The
//! level is controlled by `RUST_LOG` (e.g. `RUST_LOG=mixer_editor=debug`) and
//! defaults to `warn`.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mixer_editor::cli::{run, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mixer-editor: {e:#}");
            ExitCode::FAILURE
        }
    }
}
