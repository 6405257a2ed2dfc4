use std::sync::Arc;
use std::time::Instant;

use tsetmc_core::{InsCode, TseClient};

use crate::cli::BenchArgs;
use crate::error::CliError;

/// Fetches static data once so workers do not race to fetch it, then runs `works`
/// supervised live fetches on a blocking pool of `workers` threads.
pub fn run(client: &Arc<TseClient>, args: &BenchArgs) -> Result<(), CliError> {
    let ins_code = InsCode::parse(&args.ins_code)?;
    if args.workers == 0 {
        return Err(CliError::Command(String::from("--workers must be at least 1")));
    }

    let attempts = client.config().static_retry_attempts;
    let info = client.get_static_data_retry(&ins_code, attempts)?;
    tracing::info!(%ins_code, name = %info.name, "static data ready");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(args.workers)
        .thread_name("tsetmc-bench")
        .build()?;

    let started = Instant::now();
    let removed = runtime.block_on(async {
        let handles = (0..args.works)
            .map(|_| {
                let client = Arc::clone(client);
                let ins_code = ins_code.clone();
                tokio::task::spawn_blocking(move || client.get_live_data_supervised(&ins_code))
            })
            .collect::<Vec<_>>();

        let mut removed = 0_usize;
        for handle in handles {
            match handle.await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::error!(%ins_code, "live fetch found the instrument removed");
                    removed += 1;
                }
                Err(error) => return Err(CliError::Command(format!("worker failed: {error}"))),
            }
        }
        Ok(removed)
    })?;
    drop(runtime);

    tracing::info!(
        works = args.works,
        workers = args.workers,
        removed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "bench finished"
    );
    Ok(())
}
