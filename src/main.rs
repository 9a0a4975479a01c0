//! Hamper CLI

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::cli::Cli;

mod cli;
mod config;
mod observability;

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        report(&error.to_string());

        return ExitCode::FAILURE;
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            report(&message);

            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "command errors are reported to the user, not only to the log"
)]
fn report(message: &str) {
    eprintln!("{message}");
}
