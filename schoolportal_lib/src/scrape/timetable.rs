use std::sync::LazyLock;

use regex::Regex;
use schoolportal_api::types::{Timetable, TimetableEntry, WeekLabel, Weekday};

use super::cells;
use crate::document::Element;
use crate::extract::{is_period_code, weekday_prefix};

const MIN_DATA_CELLS: usize = 6;

static RE_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweek\s+([ab])\b").expect("invalid regex: week marker"));

/// Header state carried from row to row.
#[derive(Default)]
struct TimetableScan {
    week: WeekLabel,
    day: Option<Weekday>,
    timetable: Timetable,
}

/// Reads both timetable weeks.
///
/// Rows are visited in document order. "Week A"/"Week B" rows switch the week,
/// weekday header rows set the day, and data rows
/// `[_, period, course, class, teacher, room]` become entries under the
/// current week and day.
pub fn scrape_timetable<E: Element>(root: &E) -> Timetable {
    root.select("tr")
        .iter()
        .fold(TimetableScan::default(), scan_row)
        .timetable
}

fn scan_row<E: Element>(mut scan: TimetableScan, row: &E) -> TimetableScan {
    let row_cells = cells(row);
    let texts: Vec<String> = row_cells.iter().map(Element::text).collect();

    if texts.len() >= MIN_DATA_CELLS && is_period_code(&texts[1]) {
        if let Some(entry) = entry_from_cells(scan.day, &texts) {
            scan.timetable.week_mut(scan.week).push(entry);
        }
        return scan;
    }

    let row_text = row.text();
    if let Some(week) = week_marker(&row_text) {
        scan.week = week;
    }
    if let Some(day) = day_header(&row_cells, &row_text) {
        scan.day = Some(day);
    }
    scan
}

fn week_marker(text: &str) -> Option<WeekLabel> {
    let caps = RE_WEEK.captures(text)?;
    match caps.get(1)?.as_str() {
        "a" | "A" => Some(WeekLabel::WeekA),
        _ => Some(WeekLabel::WeekB),
    }
}

/// A single-cell row, or a row with a `colspan` + `bgcolor` cell, whose text
/// starts with a weekday name.
fn day_header<E: Element>(row_cells: &[E], row_text: &str) -> Option<Weekday> {
    if row_cells.len() == 1 {
        return weekday_prefix(row_text);
    }
    row_cells
        .iter()
        .filter(|cell| cell.attr("colspan").is_some() && cell.attr("bgcolor").is_some())
        .find_map(|cell| weekday_prefix(&cell.text()))
}

fn entry_from_cells(day: Option<Weekday>, texts: &[String]) -> Option<TimetableEntry> {
    let day = day?;
    let course = texts[2].trim();
    if course.is_empty() {
        return None;
    }
    Some(TimetableEntry {
        day,
        period: texts[1].trim().to_string(),
        course: course.to_string(),
        class_code: texts[3].clone(),
        teacher: texts[4].clone(),
        room: texts[5].clone(),
    })
}
