use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Link to a published school report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub title: String,
    pub url: String,
    /// `Year N`, or empty when unknown.
    pub year_level: String,
    /// 1 or 2; 0 when unknown.
    pub semester: u8,
    /// Four digit year; 0 when unknown.
    pub calendar_year: i32,
}

impl Report {
    /// Newest first: descending calendar year, then descending semester.
    pub fn newest_first(a: &Report, b: &Report) -> Ordering {
        b.calendar_year
            .cmp(&a.calendar_year)
            .then_with(|| b.semester.cmp(&a.semester))
    }
}
