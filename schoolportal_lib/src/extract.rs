//! Field extractors: pull one normalized value out of raw cell or parameter text.
//!
//! None of these fail. Malformed numbers become 0 and unparsable dates become
//! the current date.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate};
use percent_encoding::percent_decode_str;
use regex::Regex;
use schoolportal_api::types::Weekday;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%A, %d %B %Y",
];

const PREVIEW_CHARS: usize = 200;

static RE_NOTICE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]{3})\s+(\d{4})$").expect("invalid regex: notice date")
});

/// Sign, then either a number with `,` thousands groups or a plain number
/// whose fraction may follow a decimal comma.
static RE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?)(?:(\d{1,3}(?:,\d{3})+\b(?:\.\d+)?)|(\d+(?:[.,]\d+)?))")
        .expect("invalid regex: decimal")
});

static RE_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?(?:\d{1,3}(?:,\d{3})+\b|\d+)").expect("invalid regex: integer")
});

static RE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^P\d+[ab]?$").expect("invalid regex: period"));

/// The current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Decodes a notice `date` query parameter such as `15%20Mar%202025`.
///
/// `D MMM YYYY` with a three letter month is matched first (any case); other
/// common date spellings are tried after that. `None` means "use today".
pub fn parse_notice_date_param(value: &str) -> Option<NaiveDate> {
    let decoded = percent_decode_str(&value.replace('+', " "))
        .decode_utf8_lossy()
        .to_string();
    let trimmed = decoded.trim();

    if let Some(caps) = RE_NOTICE_DATE.captures(trimmed) {
        let month = MONTHS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(&caps[2]))
            .map(|idx| idx as u32 + 1);
        let day = caps[1].parse::<u32>().ok();
        let year = caps[3].parse::<i32>().ok();
        if let (Some(day), Some(month), Some(year)) = (day, month, year) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    parse_generic_date(trimmed)
}

/// Parses the date spellings the portal uses outside the notice parameter.
pub fn parse_generic_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// ISO `YYYY-MM-DD` of `value`, or of today when `None`.
pub fn format_notice_date(value: Option<NaiveDate>) -> String {
    value.unwrap_or_else(today).format("%Y-%m-%d").to_string()
}

/// ISO `YYYY-MM-DD` of a date-like string, or of today when it cannot be read.
pub fn format_notice_date_str(value: Option<&str>) -> String {
    format_notice_date(value.and_then(parse_notice_date_param))
}

/// First decimal number in `text` (`"94.9%"` -> 94.9), or 0.
pub fn parse_percent(text: &str) -> f64 {
    parse_optional_float(text).unwrap_or(0.0)
}

/// First decimal number in `text` with thousands separators ignored, or 0.
pub fn parse_float(text: &str) -> f64 {
    parse_optional_float(text).unwrap_or(0.0)
}

/// First decimal number in `text`, or `None` when there is none.
///
/// `1,204.5` reads as 1204.5 and `94,9` as 94.9.
pub fn parse_optional_float(text: &str) -> Option<f64> {
    let caps = RE_DECIMAL.captures(text)?;
    let digits = match (caps.get(2), caps.get(3)) {
        (Some(grouped), _) => grouped.as_str().replace(',', ""),
        (None, Some(plain)) => plain.as_str().replace(',', "."),
        (None, None) => return None,
    };
    format!("{}{}", &caps[1], digits).parse::<f64>().ok()
}

/// First integer in `text`, or 0. `"94.9%"` reads as 94.
pub fn parse_int(text: &str) -> i64 {
    RE_INTEGER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<i64>().ok())
        .unwrap_or(0)
}

/// `P<digits>` optionally followed by `a` or `b`, any case.
pub fn is_period_code(text: &str) -> bool {
    RE_PERIOD.is_match(text.trim())
}

/// The weekday `text` starts with, if any (`"Monday 3 March"` -> Monday).
pub fn weekday_prefix(text: &str) -> Option<Weekday> {
    let lower = text.trim().to_lowercase();
    Weekday::ALL
        .into_iter()
        .find(|day| lower.starts_with(&day.name().to_lowercase()))
}

/// Notice preview: the content cut to 200 characters plus an ellipsis.
pub fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn notice_param_percent_encoded() {
        assert_eq!(parse_notice_date_param("15%20Mar%202025"), Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn notice_param_upper_case_and_plus() {
        assert_eq!(parse_notice_date_param("1+JAN+2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_notice_date_param("9 dec 2023"), Some(ymd(2023, 12, 9)));
    }

    #[test]
    fn notice_param_generic_fallback() {
        assert_eq!(parse_notice_date_param("2025-03-15"), Some(ymd(2025, 3, 15)));
        assert_eq!(parse_notice_date_param("15 March 2025"), Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn notice_param_rejects_garbage() {
        assert_eq!(parse_notice_date_param("not a date"), None);
        assert_eq!(parse_notice_date_param("31 Feb 2025"), None);
        assert_eq!(parse_notice_date_param(""), None);
    }

    #[test]
    fn format_falls_back_to_today() {
        let today = today().format("%Y-%m-%d").to_string();
        assert_eq!(format_notice_date(None), today);
        assert_eq!(format_notice_date_str(Some("garbage")), today);
        assert_eq!(format_notice_date_str(None), today);
        assert_eq!(format_notice_date_str(Some("15%20Mar%202025")), "2025-03-15");
    }

    #[test]
    fn percent_extraction() {
        assert_eq!(parse_percent("94.9%"), 94.9);
        assert_eq!(parse_percent("Total: 88 %"), 88.0);
        assert_eq!(parse_percent("n/a"), 0.0);
        assert_eq!(parse_optional_float("-"), None);
    }

    #[test]
    fn commas_are_thousands_groups_or_decimal_marks() {
        assert_eq!(parse_percent("94,9%"), 94.9);
        assert_eq!(parse_float("1,204"), 1204.0);
        assert_eq!(parse_float("12,345.5 hrs"), 12345.5);
        assert_eq!(parse_optional_float("-3,5"), Some(-3.5));
        assert_eq!(parse_int("94,9%"), 94);
        assert_eq!(parse_int("-1,204,000"), -1204000);
    }

    #[test]
    fn integer_extraction_defaults_to_zero() {
        assert_eq!(parse_int("195"), 195);
        assert_eq!(parse_int("1,204"), 1204);
        assert_eq!(parse_int("94.9%"), 94);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("none"), 0);
    }

    #[test]
    fn period_codes() {
        assert!(is_period_code("P1"));
        assert!(is_period_code("p12b"));
        assert!(is_period_code(" P3a "));
        assert!(!is_period_code("P"));
        assert!(!is_period_code("P1c"));
        assert!(!is_period_code("Period 1"));
        assert!(!is_period_code("Roll Call"));
    }

    #[test]
    fn weekday_prefixes() {
        assert_eq!(weekday_prefix("Monday"), Some(Weekday::Monday));
        assert_eq!(weekday_prefix("FRIDAY 7 March"), Some(Weekday::Friday));
        assert_eq!(weekday_prefix("Saturday"), None);
        assert_eq!(weekday_prefix("Week A"), None);
    }

    #[test]
    fn preview_truncation() {
        assert_eq!(truncate_preview("short"), "short");
        let long = "x".repeat(250);
        let preview = truncate_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
        assert_eq!(truncate_preview(&"y".repeat(200)), "y".repeat(200));
    }
}
