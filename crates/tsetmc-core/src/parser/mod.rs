//! # Page Parsers
//!
//! Pure text-to-record parsing, independent of any transport. Every payload kind keeps
//! the knowledge of where its data lives in a single schema table.
//!
//! | Module | Payload |
//! |--------|---------|
//! | [`static_page`] | `TopInst` script block of the instrument page |
//! | [`identity_page`] | `<td>` cells of the identity (شناسه) tab |
//! | [`live`] | `;`/`,`/`@` delimited intraday payload |

pub mod identity_page;
pub mod live;
pub mod static_page;

pub use identity_page::{parse_identity_page, table_cells, IdentityInfo};
pub use live::{parse_best_limits, parse_live_payload, parse_real_legal, LiveFields, LivePayload};
pub use static_page::{extract_script_block, parse_script_fields, parse_script_map, ScriptFields};

use crate::ParseError;

/// Integer field; surrounding whitespace is ignored.
pub(crate) fn parse_int(field: &'static str, raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            raw: raw.to_owned(),
        })
}

pub(crate) fn parse_float(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            raw: raw.to_owned(),
        })
}

/// Decimal-formatted integer such as `"1250.00"`, truncated toward zero.
pub(crate) fn parse_float_int(field: &'static str, raw: &str) -> Result<i64, ParseError> {
    let value = parse_float(field, raw)?;
    if !value.is_finite() {
        return Err(ParseError::InvalidNumber {
            field,
            raw: raw.to_owned(),
        });
    }
    Ok(value.trunc() as i64)
}
