//! # TSETMC Core
//!
//! Blocking polling client for the Tehran Stock Exchange market pages.
//!
//! ## Overview
//!
//! - **Record types** for static instrument data and live snapshots
//! - **Fetcher** that retries the upstream's transient failures forever
//! - **Parsers** for the static script block, the identity table and the live payload
//! - **Client** with a per-instrument static cache
//! - **Observer** queue that shares static records between snapshots
//! - **Supervisor** that terminates the process on unexpected failures
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`TseClient`] facade and [`LiveData`] |
//! | [`config`] | Client configuration and `TSETMC_*` environment loading |
//! | [`domain`] | Record types |
//! | [`error`] | Error types |
//! | [`fetcher`] | GET with unbounded retry |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`observer`] | Snapshot queue with static-record interning |
//! | [`parser`] | Page and payload parsers |
//! | [`retry`] | Retry causes and delays |
//! | [`supervisor`] | Fatal error guard |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tsetmc_core::{ClientConfig, InsCode, LiveData, TseClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TseClient::with_reqwest(ClientConfig::from_env()?)?;
//!     let ins_code = InsCode::parse("46348559193224090")?;
//!
//!     client.get_static_data_retry(&ins_code, 3)?;
//!     if let LiveData::Snapshot(snapshot) = client.get_live_data(&ins_code)? {
//!         println!("{} last: {}", snapshot.static_data.name, snapshot.last);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Transient upstream failures never surface: the fetcher sleeps and retries. What does
//! surface is either a layout mismatch ([`TseError::Parse`]) or a transport failure that
//! is not a timeout or connection error ([`TseError::Transport`]). A removed instrument
//! is a regular outcome, [`LiveData::Removed`].

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod observer;
pub mod parser;
pub mod retry;
pub mod supervisor;

#[cfg(test)]
#[path = "../../../tests/support/pages.rs"]
pub(crate) mod pages;

pub use client::{LiveData, TseClient};
pub use config::ClientConfig;
pub use domain::{
    format_snapshot_date, BestLimit, InsCode, Instrument, LocalDateTime, MarketType, RealLegal,
    State, StaticInstrumentInfo, BOOK_DEPTH, FUND_FLOW, YESTERDAY_FINAL_UNSET,
};
pub use error::{ParseError, TseError, ValidationError};
pub use fetcher::Fetcher;
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use observer::Observer;
pub use retry::{RetryCause, RetryPolicy, SERVICE_ERROR_MARKERS};
pub use supervisor::{supervise, supervise_with};
