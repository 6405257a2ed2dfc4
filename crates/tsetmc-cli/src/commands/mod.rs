mod bench;
mod live;
mod static_data;
mod watch;

use std::sync::Arc;
use std::time::Duration;

use tsetmc_core::{ClientConfig, InsCode, TseClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let client = Arc::new(TseClient::with_reqwest(config(cli)?)?);

    match &cli.command {
        Command::Static(args) => {
            static_data::run(&client, &parse_ins_code(&args.ins_code)?, cli.pretty)
        }
        Command::Live(args) => live::run(&client, &parse_ins_code(&args.ins_code)?, cli.pretty),
        Command::Bench(args) => bench::run(&client, args),
        Command::Watch(args) => watch::run(&client, args, cli.pretty),
    }
}

/// Environment configuration with command-line overrides applied.
fn config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_request_timeout(Duration::from_millis(timeout_ms));
    }
    Ok(config)
}

fn parse_ins_code(raw: &str) -> Result<InsCode, CliError> {
    Ok(InsCode::parse(raw)?)
}
