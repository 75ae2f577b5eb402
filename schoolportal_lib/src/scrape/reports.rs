use std::sync::LazyLock;

use regex::Regex;
use schoolportal_api::types::Report;
use url::Url;

use super::ScrapeContext;
use crate::document::Element;

const FALLBACK_BASE: &str = "http://localhost/";

static RE_YEAR_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bYear\s*(\d{1,2})\b").expect("invalid regex: year level"));

static RE_SEMESTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSemester\s*([12])\b|\bS([12])\b").expect("invalid regex: semester")
});

static RE_CALENDAR_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("invalid regex: calendar year"));

/// Reads the report links on the reports page, newest first.
pub fn scrape_reports<E: Element>(root: &E, ctx: &ScrapeContext) -> Vec<Report> {
    let base = ctx
        .page_url
        .as_deref()
        .and_then(|url| Url::parse(url).ok())
        .or_else(|| Url::parse(FALLBACK_BASE).ok());

    let mut reports: Vec<Report> = root
        .select("a[href]")
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.attr("href")?;
            let title = anchor.text();
            if !href.to_ascii_lowercase().contains("viewreport") || !title.contains("Report") {
                return None;
            }
            let resolved = base.as_ref().and_then(|base| base.join(href.trim()).ok());
            Some(build_report(title, href.trim(), resolved.as_ref()))
        })
        .collect();

    reports.sort_by(Report::newest_first);
    reports
}

fn build_report(title: String, href: &str, resolved: Option<&Url>) -> Report {
    let param = |keys: &[&str]| -> Option<String> {
        let url = resolved?;
        url.query_pairs()
            .find(|(key, _)| keys.iter().any(|k| key.eq_ignore_ascii_case(k)))
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let year_level = RE_YEAR_LEVEL
        .captures(&title)
        .map(|caps| caps[1].to_string())
        .or_else(|| {
            param(&["yearLevel", "year_level"])
                .map(|value| value.chars().filter(char::is_ascii_digit).collect::<String>())
                .filter(|digits| !digits.is_empty())
        })
        .map(|n| format!("Year {n}"))
        .unwrap_or_default();

    let semester = RE_SEMESTER
        .captures(&title)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .or_else(|| {
            param(&["semester", "sem"])
                .and_then(|value| value.parse::<u8>().ok())
                .filter(|s| matches!(s, 1 | 2))
        })
        .unwrap_or(0);

    let calendar_year = RE_CALENDAR_YEAR
        .captures(&title)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .or_else(|| {
            param(&["calendarYear", "year"])
                .and_then(|value| value.parse::<i32>().ok())
                .filter(|year| (2000..=2099).contains(year))
        })
        .unwrap_or(0);

    let url = resolved
        .map(Url::to_string)
        .unwrap_or_else(|| href.to_string());

    Report {
        title,
        url,
        year_level,
        semester,
        calendar_year,
    }
}
