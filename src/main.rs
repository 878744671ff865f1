//! Binary entry point for stream-gen.
//!
//! stream-gen: incremental entity extraction for streamed chat replies.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::io;
use std::process::ExitCode;
use stream_gen::cli::output::{OutputFormat, format_error};
use stream_gen::cli::{Cli, execute_to};
use stream_gen::error::{Error, IoError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);
    init_tracing(cli.verbose);

    let mut stdout = io::stdout().lock();
    match execute_to(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        // Reader went away (e.g. piped to `head`)
        Err(Error::Io(IoError::BrokenPipe)) => ExitCode::SUCCESS,
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json | OutputFormat::Ndjson => {
                    // JSON errors go to stdout for programmatic parsing
                    println!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with command output.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "stream_gen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
