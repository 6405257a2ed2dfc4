//! Identity tab of `Loader.aspx?Partree=15131M`: a flat list of label/value `<td>` cells.

use std::sync::OnceLock;

use regex::Regex;

use super::parse_int;
use crate::ParseError;

const SECTOR_LABEL: (usize, &str) = (22, "گروه صنعت");
const SECTOR_NAME: usize = 23;
const SUBSECTOR_CODE_LABEL: (usize, &str) = (24, "کد زیر گروه صنعت");
const SUBSECTOR_CODE: usize = 25;
const SUBSECTOR_NAME_LABEL: (usize, &str) = (26, "زیر گروه صنعت");
const SUBSECTOR_NAME: usize = 27;

const REQUIRED_CELLS: usize = SUBSECTOR_NAME + 1;

/// Sector naming taken from the identity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInfo {
    pub industry_sector_name: String,
    pub industry_subsector_code: i64,
    pub industry_subsector_name: String,
}

#[allow(clippy::expect_used)]
fn cell_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"<td>(.*?)</td>").expect("table cell regex is valid"))
}

/// Trimmed text of every `<td>` cell, in document order.
pub fn table_cells(page: &str) -> Vec<String> {
    cell_pattern()
        .captures_iter(page)
        .filter_map(|captures| captures.get(1))
        .map(|cell| cell.as_str().trim().to_owned())
        .collect()
}

/// Validates the fixed label positions and reads the values next to them.
///
/// A short table or a label in the wrong place means the page layout changed; both are
/// reported as errors rather than guessed around.
pub fn parse_identity_page(page: &str) -> Result<IdentityInfo, ParseError> {
    let cells = table_cells(page);
    if cells.len() < REQUIRED_CELLS {
        return Err(ParseError::MissingCell {
            expected: REQUIRED_CELLS,
            found: cells.len(),
        });
    }

    for (index, expected) in [SECTOR_LABEL, SUBSECTOR_CODE_LABEL, SUBSECTOR_NAME_LABEL] {
        if cells[index] != expected {
            return Err(ParseError::LabelMismatch {
                index,
                expected,
                found: cells[index].clone(),
            });
        }
    }

    Ok(IdentityInfo {
        industry_sector_name: cells[SECTOR_NAME].clone(),
        industry_subsector_code: parse_int("industry_subsector_code", &cells[SUBSECTOR_CODE])?,
        industry_subsector_name: cells[SUBSECTOR_NAME].clone(),
    })
}
