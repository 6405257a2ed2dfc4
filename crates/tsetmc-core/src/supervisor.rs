//! Last-resort guard for the live fetch path.
//!
//! Stale or half-parsed market data is worse than no data, so an error or panic that
//! reaches the supervisor is logged with a backtrace and the process is terminated.
//! A process manager is expected to restart it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs `operation`, aborting the process on `Err` or panic.
pub fn supervise<T, E, F>(label: &str, operation: F) -> T
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    supervise_with(label, operation, abort)
}

/// Same as [`supervise`] with a custom terminator.
pub fn supervise_with<T, E, F>(label: &str, operation: F, terminate: fn() -> !) -> T
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(value)) => value,
        Ok(Err(error)) => {
            let backtrace = Backtrace::force_capture();
            tracing::error!(label, %error, %backtrace, "unrecoverable error, going down");
            terminate()
        }
        Err(payload) => {
            let backtrace = Backtrace::force_capture();
            tracing::error!(
                label,
                panic = panic_message(payload.as_ref()),
                %backtrace,
                "panic, going down"
            );
            terminate()
        }
    }
}

fn abort() -> ! {
    std::process::abort()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
