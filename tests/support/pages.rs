//! Upstream page bodies shared by the unit tests and the behavior tests.

#![allow(dead_code)]

/// Script assignments of a regular exchange stock, without the `<script>` wrapper.
pub const ASSIGNMENTS: &[(&str, &str)] = &[
    ("TopInst", "'1'"),
    ("LVal18AFC", "'فولاد'"),
    ("LSecVal", "'فولاد مباركه اصفهان'"),
    ("InstrumentID", "'IRO1FOLD0001'"),
    ("CgrValCot", "'N1'"),
    ("BaseVol", "5000000"),
    ("CSecVal", "'27 '"),
    ("Flow", "1"),
    ("ZTitad", "500"),
    ("QTotTran5JAvg", "40000000"),
    ("MaxWeek", "1050.00"),
    ("MinWeek", "900.00"),
    ("MaxYear", "1400.00"),
    ("MinYear", "700.00"),
    ("PSGelStaMax", "1000.00"),
    ("PSGelStaMin", "950.00"),
    ("SectorPE", "'7.5'"),
    ("KAjCapValCpsIdx", "''"),
];

/// Copy of [`ASSIGNMENTS`] with `key` set to `value`, appended when absent.
pub fn assignments_with(key: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
    let mut assignments = ASSIGNMENTS.to_vec();
    match assignments.iter_mut().find(|(name, _)| *name == key) {
        Some(entry) => entry.1 = value,
        None => assignments.push((key, value)),
    }
    assignments
}

/// Full instrument page around a script block built from `assignments`.
pub fn static_page(assignments: &[(&str, &str)]) -> String {
    let body = assignments
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("<html><head></head><body><div id=\"d\"></div><script>var {body};</script></body></html>")
}

pub const IDENTITY_LABELS: [&str; 3] = ["گروه صنعت", "کد زیر گروه صنعت", "زیر گروه صنعت"];
pub const IDENTITY_VALUES: [&str; 3] = ["فلزات اساسي", "2710", "توليد آهن و فولاد"];

/// Identity table with 22 filler cells, then the three label/value pairs.
///
/// Values are padded with spaces the way the upstream renders them.
pub fn identity_page_with(labels: [&str; 3], values: [&str; 3]) -> String {
    let mut cells = (0..22).map(|index| format!("cell {index}")).collect::<Vec<_>>();
    for (label, value) in labels.iter().zip(values) {
        cells.push((*label).to_owned());
        cells.push(format!(" {value} "));
    }

    let rows = cells
        .chunks(2)
        .map(|pair| format!("<tr><td>{}</td><td>{}</td></tr>", pair[0], pair[1]))
        .collect::<String>();
    format!("<table>{rows}</table>")
}

pub fn identity_page_with_labels(labels: [&str; 3]) -> String {
    identity_page_with(labels, IDENTITY_VALUES)
}

pub fn identity_page() -> String {
    identity_page_with(IDENTITY_LABELS, IDENTITY_VALUES)
}

/// Segment 0 of an active exchange stock.
pub const PRICES: &str =
    "12:29:59,A ,1000,990,985,980,1000,960,120,100000,99000000,0,20240307,122959";
pub const BEST_LIMITS: &str = "3@50@1000@1010@70@4,1@10@995@1015@20@2,";
pub const REAL_LEGAL: &str = "6000,0,6000,4000,2000,30,0,30,40,1";

pub fn live_payload(prices: &str, best_limits: &str, real_legal: &str, fund: &str) -> String {
    format!("{prices};A,2345678.1;{best_limits};;{real_legal};;;{fund}")
}

pub fn default_live_payload() -> String {
    live_payload(PRICES, BEST_LIMITS, REAL_LEGAL, "0")
}
