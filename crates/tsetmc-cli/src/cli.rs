//! CLI argument definitions for tsetmc.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `static` | Fetch an instrument's static data |
//! | `live` | Fetch one live snapshot with derived figures |
//! | `bench` | Run many concurrent live fetches and report elapsed time |
//! | `watch` | Poll live data through an observer queue |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--timeout-ms` | `4000` | Request timeout in ms, overrides `TSETMC_REQUEST_TIMEOUT_MS` |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! tsetmc static 46348559193224090 --pretty
//! tsetmc bench 55924039170758349 --works 200 --workers 30
//! RUST_LOG=debug tsetmc watch 46348559193224090 --count 10
//! ```

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tsetmc",
    author,
    version,
    about = "Polling client for TSETMC instrument data"
)]
pub struct Cli {
    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch static data with bounded retries.
    Static(InstrumentArgs),
    /// Fetch one live snapshot.
    Live(InstrumentArgs),
    /// Fetch static data once, then run many live fetches on a thread pool.
    Bench(BenchArgs),
    /// Poll live data on a producer thread and print what the observer hands out.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct InstrumentArgs {
    /// Numeric instrument code (`i` parameter of the site).
    pub ins_code: String,
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    pub ins_code: String,

    /// Number of live fetches.
    #[arg(long, default_value_t = 200)]
    pub works: usize,

    /// Worker threads running the fetches.
    #[arg(long, default_value_t = 30)]
    pub workers: usize,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    pub ins_code: String,

    /// Delay between polls in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub interval_ms: u64,

    /// Stop after this many snapshots; runs until interrupted when omitted.
    #[arg(long)]
    pub count: Option<usize>,
}
