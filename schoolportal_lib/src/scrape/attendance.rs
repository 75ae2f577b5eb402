use std::sync::LazyLock;

use regex::Regex;
use schoolportal_api::types::{Attendance, AttendanceSubject, AttendanceYearly};

use super::{cell_texts, data_tables, table_rows};
use crate::document::Element;
use crate::extract::{parse_float, parse_int, parse_optional_float, parse_percent};

const PRIMARY_TABLES: &str = "table.attendance, table.grid";
const FALLBACK_TABLES: &str = "table";

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^20\d{2}$").expect("invalid regex: year"));

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TableSignature {
    Yearly,
    Subjects,
}

/// Reads yearly attendance summaries and per-class roll statistics.
///
/// Tables are recognised by their header row. If the attendance tables proper
/// hold no yearly rows, every table on the page is searched for them.
pub fn scrape_attendance<E: Element>(root: &E) -> Attendance {
    let mut attendance = Attendance::default();

    for table in data_tables(root, PRIMARY_TABLES) {
        let rows = table_rows(&table);
        let Some((header, body)) = rows.split_first() else {
            continue;
        };
        match signature(&header.text()) {
            Some(TableSignature::Yearly) => {
                attendance.yearly.extend(body.iter().filter_map(yearly_row))
            }
            Some(TableSignature::Subjects) => {
                attendance.subjects.extend(body.iter().filter_map(subject_row))
            }
            None => {}
        }
    }

    if attendance.yearly.is_empty() {
        for table in data_tables(root, FALLBACK_TABLES) {
            let rows = table_rows(&table);
            let Some((header, body)) = rows.split_first() else {
                continue;
            };
            if signature(&header.text()) == Some(TableSignature::Yearly) {
                attendance.yearly.extend(body.iter().filter_map(yearly_row));
            }
        }
    }

    attendance
}

fn signature(header_text: &str) -> Option<TableSignature> {
    let compact: String = header_text.split_whitespace().collect();
    if compact.contains("Class") && compact.contains("RollsMarked") {
        return Some(TableSignature::Subjects);
    }
    if header_text.contains("Year")
        && (header_text.contains("School") || header_text.contains("Days"))
    {
        return Some(TableSignature::Yearly);
    }
    None
}

/// `[year, school days, whole-day absences, whole-day %, partial absences, total %]`
fn yearly_row<E: Element>(row: &E) -> Option<AttendanceYearly> {
    let texts = cell_texts(row);
    if texts.len() < 6 || !RE_YEAR.is_match(texts[0].trim()) {
        return None;
    }
    Some(AttendanceYearly {
        year: texts[0].trim().to_string(),
        school_days: parse_int(&texts[1]),
        whole_day_absences: parse_int(&texts[2]),
        whole_day_percentage: parse_percent(&texts[3]),
        partial_absences: parse_float(&texts[4]),
        total_percentage: parse_percent(&texts[5]),
    })
}

/// `[class, rolls marked, absent, .., percentage]`
fn subject_row<E: Element>(row: &E) -> Option<AttendanceSubject> {
    let texts = cell_texts(row);
    if texts.len() < 5 {
        return None;
    }
    let class_code = texts[0].trim();
    if class_code.chars().count() < 2
        || class_code.contains("Class")
        || class_code.contains("Total")
    {
        return None;
    }
    Some(AttendanceSubject {
        class_code: class_code.to_string(),
        rolls_marked: parse_int(&texts[1]),
        absent: parse_int(&texts[2]),
        percentage: parse_optional_float(&texts[texts.len() - 1]),
    })
}
