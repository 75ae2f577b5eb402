//! Page scrapers: one per portal page type.
//!
//! Each scraper is a pure function of a parsed page (and, where it matters, a
//! [`ScrapeContext`]). Missing elements give empty results, never errors.

mod attendance;
mod calendar;
mod classes;
mod grades;
mod notices;
mod reports;
mod timetable;
mod user;

pub use attendance::scrape_attendance;
pub use calendar::scrape_calendar;
pub use classes::scrape_classes;
pub use grades::scrape_grades;
pub use notices::scrape_notices;
pub use reports::scrape_reports;
pub use timetable::scrape_timetable;
pub use user::{scrape_user_id, scrape_user_name};

use std::fmt;

use chrono::NaiveDate;
use schoolportal_api::types::{
    Attendance, CalendarEvent, ClassInfo, Grade, Notice, Report, Timetable,
};
use serde::{Deserialize, Serialize};

use crate::document::Element;
use crate::extract;

/// Which scraper a fetched page is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Timetable,
    Notices,
    Grades,
    Attendance,
    Reports,
    Classes,
    Calendar,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageKind::Timetable => "timetable",
            PageKind::Notices => "notices",
            PageKind::Grades => "grades",
            PageKind::Attendance => "attendance",
            PageKind::Reports => "reports",
            PageKind::Classes => "classes",
            PageKind::Calendar => "calendar",
        };
        f.write_str(name)
    }
}

/// Fetch parameters a scraper may need besides the page itself.
#[derive(Clone, Debug)]
pub struct ScrapeContext {
    /// Absolute URL the page was fetched from; used to resolve relative links.
    pub page_url: Option<String>,
    /// Day a date-filtered notices page was requested for.
    pub notice_date: Option<NaiveDate>,
    /// The crawl's notion of "today".
    pub today: NaiveDate,
}

impl ScrapeContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            page_url: None,
            notice_date: None,
            today,
        }
    }

    pub fn with_page_url(mut self, url: &str) -> Self {
        self.page_url = Some(url.to_string());
        self
    }

    pub fn with_notice_date(mut self, date: Option<NaiveDate>) -> Self {
        self.notice_date = date;
        self
    }
}

impl Default for ScrapeContext {
    fn default() -> Self {
        Self::new(extract::today())
    }
}

/// Result of scraping one page, ready to be folded into the aggregate record.
#[derive(Clone, Debug, PartialEq)]
pub enum PageData {
    Timetable(Timetable),
    Notices(Vec<Notice>),
    Grades(Vec<Grade>),
    Attendance(Attendance),
    Reports(Vec<Report>),
    Classes(Vec<ClassInfo>),
    Calendar(Vec<CalendarEvent>),
}

impl PageData {
    pub fn item_count(&self) -> usize {
        match self {
            PageData::Timetable(t) => t.len(),
            PageData::Notices(n) => n.len(),
            PageData::Grades(g) => g.len(),
            PageData::Attendance(a) => a.yearly.len() + a.subjects.len(),
            PageData::Reports(r) => r.len(),
            PageData::Classes(c) => c.len(),
            PageData::Calendar(c) => c.len(),
        }
    }
}

/// Runs the scraper matching `kind` over `root`.
pub fn scrape_page<E: Element>(kind: PageKind, root: &E, ctx: &ScrapeContext) -> PageData {
    match kind {
        PageKind::Timetable => PageData::Timetable(scrape_timetable(root)),
        PageKind::Notices => PageData::Notices(scrape_notices(root, ctx)),
        PageKind::Grades => PageData::Grades(scrape_grades(root)),
        PageKind::Attendance => PageData::Attendance(scrape_attendance(root)),
        PageKind::Reports => PageData::Reports(scrape_reports(root, ctx)),
        PageKind::Classes => PageData::Classes(scrape_classes(root)),
        PageKind::Calendar => PageData::Calendar(scrape_calendar(root)),
    }
}

/// `td`/`th` children of a row.
pub(crate) fn cells<E: Element>(row: &E) -> Vec<E> {
    row.children()
        .into_iter()
        .filter(|child| matches!(child.tag_name().as_str(), "td" | "th"))
        .collect()
}

pub(crate) fn cell_texts<E: Element>(row: &E) -> Vec<String> {
    cells(row).iter().map(Element::text).collect()
}

/// Rows belonging to `table` itself, not to tables nested inside it.
pub(crate) fn table_rows<E: Element>(table: &E) -> Vec<E> {
    let mut rows = Vec::new();
    for child in table.children() {
        match child.tag_name().as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .into_iter()
                    .filter(|row| row.tag_name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Tables matching `pattern` that hold data rather than page layout, i.e.
/// that contain no nested table.
pub(crate) fn data_tables<E: Element>(root: &E, pattern: &str) -> Vec<E> {
    root.select(pattern)
        .into_iter()
        .filter(|table| table.tag_name() == "table" && table.select("table").is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::document::HtmlDocument;

    pub fn doc(markup: &str) -> HtmlDocument {
        HtmlDocument::parse(markup)
    }

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
