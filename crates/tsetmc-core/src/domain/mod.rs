//! # Domain Models
//!
//! Record types produced by the parsers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StaticInstrumentInfo`] | Per-day reference data (thresholds, share count, sector) |
//! | [`Instrument`] | Live snapshot sharing a static record |
//! | [`BestLimit`] | One order-book rung |
//! | [`RealLegal`] | Individual vs institutional volume split |
//! | [`State`] | Trading state code |
//! | [`MarketType`] | Listing market |
//! | [`InsCode`] | Validated numeric instrument code |
//! | [`LocalDateTime`] | Local wall-clock timestamp |

mod ins_code;
mod models;
mod timestamp;

pub use ins_code::InsCode;
pub use models::{
    BestLimit, Instrument, MarketType, RealLegal, State, StaticInstrumentInfo, BOOK_DEPTH,
    FUND_FLOW, YESTERDAY_FINAL_UNSET,
};
pub use timestamp::{format_snapshot_date, LocalDateTime};

#[cfg(test)]
pub(crate) use models::fixtures;
