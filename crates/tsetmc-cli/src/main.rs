mod cli;
mod commands;
mod error;
mod output;
mod telemetry;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

// The blocking HTTP client must be created and dropped outside any async context,
// so `main` stays synchronous and `bench` owns its own runtime.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("info");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    commands::run(&cli)
}
