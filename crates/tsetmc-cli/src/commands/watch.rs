use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tsetmc_core::{InsCode, Observer, TseClient};

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::print_json;

pub fn run(client: &Arc<TseClient>, args: &WatchArgs, pretty: bool) -> Result<(), CliError> {
    let ins_code = InsCode::parse(&args.ins_code)?;
    let interval = Duration::from_millis(args.interval_ms);
    let observer = Arc::new(Observer::new());
    let stopped = Arc::new(AtomicBool::new(false));

    let producer = {
        let client = Arc::clone(client);
        let observer = Arc::clone(&observer);
        let stopped = Arc::clone(&stopped);
        let count = args.count;
        let ins_code = ins_code.clone();
        thread::Builder::new()
            .name(String::from("tsetmc-watch"))
            .spawn(move || {
                let mut produced = 0_usize;
                let wanted = |produced: usize| count.map_or(true, |count| produced < count);
                while wanted(produced) && !stopped.load(Ordering::Relaxed) {
                    match client.get_live_data_supervised(&ins_code) {
                        Some(snapshot) => {
                            observer.put(snapshot);
                            produced += 1;
                        }
                        None => break,
                    }
                    thread::sleep(interval);
                }
            })?
    };

    let mut printed = 0_usize;
    let result = loop {
        if args.count.is_some_and(|count| printed >= count) {
            break Ok(());
        }
        match observer.get_timeout(interval.max(Duration::from_millis(100))) {
            Some(snapshot) => {
                if let Err(error) = print_json(&snapshot, pretty) {
                    break Err(error);
                }
                printed += 1;
            }
            None if producer.is_finished() && observer.is_empty() => {
                tracing::warn!(%ins_code, printed, "producer stopped");
                break Ok(());
            }
            None => {}
        }
    };

    stopped.store(true, Ordering::Relaxed);
    producer
        .join()
        .map_err(|_| CliError::Command(String::from("watch producer panicked")))?;
    result
}
