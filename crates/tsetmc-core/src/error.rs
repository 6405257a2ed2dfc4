use thiserror::Error;

use crate::http_client::HttpError;

/// Validation errors for caller-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument code cannot be empty")]
    EmptyInsCode,
    #[error("instrument code contains invalid character '{ch}' at index {index}")]
    InsCodeInvalidChar { ch: char, index: usize },

    #[error("config value '{name}' is not valid: '{value}'")]
    InvalidConfig { name: &'static str, value: String },
}

/// Structural mismatch between a response body and the layout the parsers expect.
///
/// These are never retried: a page that parses into the wrong shape means the
/// upstream format changed and any data derived from it would be wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("static page is missing field '{key}'")]
    MissingField { key: &'static str },

    #[error("field '{field}' is not a valid number: '{raw}'")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("identity table has {found} cells, expected at least {expected}")]
    MissingCell { expected: usize, found: usize },

    #[error("identity table cell {index} is '{found}', expected '{expected}'")]
    LabelMismatch {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("live payload is missing segment '{segment}' (index {index})")]
    MissingSegment { segment: &'static str, index: usize },

    #[error("live payload is missing price field '{field}' (index {index})")]
    MissingPriceField { field: &'static str, index: usize },

    #[error("order book group '{raw}' has {found} parts, expected 6")]
    MalformedBestLimit { raw: String, found: usize },

    #[error("real/legal segment has {found} values, expected at least 10")]
    MalformedRealLegal { found: usize },

    #[error("market value overflows: final price {final_price} x {number_of_shares} shares")]
    MarketValueOverflow {
        final_price: i64,
        number_of_shares: i64,
    },
}

/// Top-level error type for client operations.
#[derive(Debug, Error)]
pub enum TseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("parse error for instrument {ins_code}: {source}")]
    Parse {
        ins_code: String,
        #[source]
        source: ParseError,
    },

    #[error("transport error: {0}")]
    Transport(#[from] HttpError),
}

impl TseError {
    pub fn parse(ins_code: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            ins_code: ins_code.into(),
            source,
        }
    }
}
