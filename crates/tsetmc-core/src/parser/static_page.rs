//! `TopInst` script block of `Loader.aspx?ParTree=151311`.
//!
//! The page embeds one `<script>var TopInst=...,Key='value',Key=value;</script>` block.
//! Assignments are separated by `,` or `;`; string values are single-quoted.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{parse_float, parse_float_int, parse_int};
use crate::ParseError;

/// Script keys, grouped by how their value is read.
mod keys {
    pub const INSTRUMENT_ID: &str = "InstrumentID";
    pub const FULL_NAME: &str = "LSecVal";
    pub const NAME: &str = "LVal18AFC";
    pub const GROUP_CODE: &str = "CgrValCot";

    pub const BASE_VOL: &str = "BaseVol";
    pub const SECTOR_CODE: &str = "CSecVal";
    pub const FLOW: &str = "Flow";
    pub const SHARES: &str = "ZTitad";
    pub const MONTH_AVERAGE_VOL: &str = "QTotTran5JAvg";

    // Published with a decimal part.
    pub const MAX_WEEK: &str = "MaxWeek";
    pub const MIN_WEEK: &str = "MinWeek";
    pub const MAX_YEAR: &str = "MaxYear";
    pub const MIN_YEAR: &str = "MinYear";
    pub const HIGH_THRESHOLD: &str = "PSGelStaMax";
    pub const LOW_THRESHOLD: &str = "PSGelStaMin";

    // Absent for non-fund instruments.
    pub const NAV: &str = "NAV";
    // Empty string means zero.
    pub const SECTOR_PE: &str = "SectorPE";
    pub const INDEX_COEFFICIENT: &str = "KAjCapValCpsIdx";
}

/// Everything the static record takes from the script block.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFields {
    pub name: String,
    pub full_name: String,
    pub instrument_id: String,
    pub instrument_group_code: String,
    pub base_vol: i64,
    pub industry_sector_code: i64,
    pub flow: i64,
    pub number_of_shares: i64,
    pub month_average_vol: i64,
    pub max_week: i64,
    pub min_week: i64,
    pub max_year: i64,
    pub min_year: i64,
    pub high_threshold: i64,
    pub low_threshold: i64,
    pub nav: Option<f64>,
    pub sector_pe: f64,
    pub index_coefficient: i64,
}

#[allow(clippy::expect_used)]
fn script_pattern() -> &'static Regex {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        Regex::new(r"<script>var TopInst[\s\S]*;</script>").expect("script block regex is valid")
    })
}

/// The `TopInst` script block, or `None` when the page does not carry one.
pub fn extract_script_block(page: &str) -> Option<&str> {
    script_pattern().find(page).map(|found| found.as_str())
}

/// Splits a script block into its key/value assignments.
///
/// The text after the final separator (the closing `</script>`) is dropped. Entries
/// without `=` are skipped. Single-quoted values are unquoted.
pub fn parse_script_map(block: &str) -> HashMap<String, String> {
    let mut entries = block.split([',', ';']).collect::<Vec<_>>();
    entries.pop();

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let entry = if index == 0 {
                entry.replacen("<script>var ", "", 1)
            } else {
                entry.to_owned()
            };
            let (key, value) = entry.split_once('=')?;
            Some((key.trim().to_owned(), unquote(value).to_owned()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    match value.strip_prefix('\'') {
        Some(rest) => rest.strip_suffix('\'').unwrap_or(rest),
        None => value,
    }
}

struct ScriptMap<'a>(&'a HashMap<String, String>);

impl ScriptMap<'_> {
    fn raw(&self, key: &'static str) -> Result<&str, ParseError> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or(ParseError::MissingField { key })
    }

    fn text(&self, key: &'static str) -> Result<String, ParseError> {
        self.raw(key).map(str::to_owned)
    }

    fn int(&self, key: &'static str) -> Result<i64, ParseError> {
        parse_int(key, self.raw(key)?)
    }

    fn float_int(&self, key: &'static str) -> Result<i64, ParseError> {
        parse_float_int(key, self.raw(key)?)
    }

    fn optional_float(&self, key: &'static str) -> Result<Option<f64>, ParseError> {
        self.0
            .get(key)
            .map(|raw| parse_float(key, raw))
            .transpose()
    }

    fn float_or_zero(&self, key: &'static str) -> Result<f64, ParseError> {
        match self.raw(key)? {
            raw if raw.trim().is_empty() => Ok(0.0),
            raw => parse_float(key, raw),
        }
    }

    fn int_or_zero(&self, key: &'static str) -> Result<i64, ParseError> {
        match self.raw(key)? {
            raw if raw.trim().is_empty() => Ok(0),
            raw => parse_int(key, raw),
        }
    }
}

/// Typed fields from a key/value map produced by [`parse_script_map`].
pub fn parse_script_fields(map: &HashMap<String, String>) -> Result<ScriptFields, ParseError> {
    let map = ScriptMap(map);

    Ok(ScriptFields {
        name: map.text(keys::NAME)?,
        full_name: map.text(keys::FULL_NAME)?,
        instrument_id: map.text(keys::INSTRUMENT_ID)?,
        instrument_group_code: map.text(keys::GROUP_CODE)?,
        base_vol: map.int(keys::BASE_VOL)?,
        industry_sector_code: map.int(keys::SECTOR_CODE)?,
        flow: map.int(keys::FLOW)?,
        number_of_shares: map.int(keys::SHARES)?,
        month_average_vol: map.int(keys::MONTH_AVERAGE_VOL)?,
        max_week: map.float_int(keys::MAX_WEEK)?,
        min_week: map.float_int(keys::MIN_WEEK)?,
        max_year: map.float_int(keys::MAX_YEAR)?,
        min_year: map.float_int(keys::MIN_YEAR)?,
        high_threshold: map.float_int(keys::HIGH_THRESHOLD)?,
        low_threshold: map.float_int(keys::LOW_THRESHOLD)?,
        nav: map.optional_float(keys::NAV)?,
        sector_pe: map.float_or_zero(keys::SECTOR_PE)?,
        index_coefficient: map.int_or_zero(keys::INDEX_COEFFICIENT)?,
    })
}
