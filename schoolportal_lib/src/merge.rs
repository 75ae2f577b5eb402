//! Cross-page reconciliation into one [`AggregateRecord`].
//!
//! Notices and calendar events overlap between the date-windowed pages, and
//! the two classes-page views list the same classes with different columns.

use std::collections::{HashMap, HashSet};

use schoolportal_api::types::{AggregateRecord, CalendarEvent, ClassInfo, Notice, Report};

use crate::scrape::PageData;

/// Folds one page's scrape result into the record.
pub fn fold_into(record: &mut AggregateRecord, data: PageData) {
    match data {
        PageData::Timetable(timetable) => {
            record.timetable.week_a.extend(timetable.week_a);
            record.timetable.week_b.extend(timetable.week_b);
        }
        PageData::Notices(notices) => merge_notices(&mut record.notices, notices),
        PageData::Grades(grades) => record.grades.extend(grades),
        PageData::Attendance(attendance) => {
            record.attendance.yearly.extend(attendance.yearly);
            record.attendance.subjects.extend(attendance.subjects);
        }
        PageData::Reports(reports) => merge_reports(&mut record.reports, reports),
        PageData::Classes(classes) => merge_classes(&mut record.classes, classes),
        PageData::Calendar(events) => merge_calendar(&mut record.calendar, events),
    }
}

/// Merges notices by identity key.
///
/// A notice seen again gains the new dates (first-seen order, no repeats)
/// and its primary `date` becomes the earliest date seen so far.
pub fn merge_notices(existing: &mut Vec<Notice>, incoming: Vec<Notice>) {
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, notice)| (notice.identity_key(), i))
        .collect();

    for mut notice in incoming {
        if notice.dates.is_empty() {
            notice.dates.push(notice.date.clone());
        }
        let key = notice.identity_key();
        match index.get(&key).copied() {
            Some(i) => {
                let current = &mut existing[i];
                for date in notice.dates {
                    if !current.dates.contains(&date) {
                        current.dates.push(date);
                    }
                }
                if notice.date < current.date {
                    current.date = notice.date;
                }
            }
            None => {
                let mut seen = HashSet::new();
                notice.dates.retain(|date| seen.insert(date.clone()));
                if let Some(earliest) = notice.dates.iter().min() {
                    if *earliest < notice.date {
                        notice.date = earliest.clone();
                    }
                }
                index.insert(key, existing.len());
                existing.push(notice);
            }
        }
    }
}

/// Appends events whose `(title, date)` key is not yet present.
pub fn merge_calendar(existing: &mut Vec<CalendarEvent>, incoming: Vec<CalendarEvent>) {
    let mut seen: HashSet<(String, String)> =
        existing.iter().map(CalendarEvent::dedup_key).collect();
    existing.extend(
        incoming
            .into_iter()
            .filter(|event| seen.insert(event.dedup_key())),
    );
}

/// Merges classes by class code; a later entry fills blanks in an earlier one.
pub fn merge_classes(existing: &mut Vec<ClassInfo>, incoming: Vec<ClassInfo>) {
    for class in incoming {
        match existing
            .iter_mut()
            .find(|current| current.class_code == class.class_code)
        {
            Some(current) => current.fill_from(&class),
            None => existing.push(class),
        }
    }
}

/// Appends reports and restores newest-first order.
pub fn merge_reports(existing: &mut Vec<Report>, incoming: Vec<Report>) {
    existing.extend(incoming);
    existing.sort_by(Report::newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolportal_api::types::{EventKind, TimetableEntry, UserInfo, Weekday};

    fn notice(title: &str, content: &str, date: &str) -> Notice {
        Notice {
            title: title.into(),
            content: content.into(),
            content_html: content.into(),
            preview: content.into(),
            date: date.into(),
            current_day: "2025-03-15".into(),
            dates: vec![date.into()],
        }
    }

    fn report(year: i32, semester: u8) -> Report {
        Report {
            title: format!("{year} S{semester} Report"),
            url: format!("http://localhost/viewreport.asp?y={year}&s={semester}"),
            year_level: String::new(),
            semester,
            calendar_year: year,
        }
    }

    #[test]
    fn same_notice_on_two_dates_merges() {
        let mut notices = vec![notice("Assembly", "Hall at 9", "2025-03-14")];
        merge_notices(&mut notices, vec![notice("Assembly", "Hall at 9", "2025-03-12")]);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].date, "2025-03-12");
        assert_eq!(notices[0].dates, vec!["2025-03-14", "2025-03-12"]);
    }

    #[test]
    fn notice_dates_are_the_union_for_every_arrival_order() {
        let dates = ["2025-03-10", "2025-03-08", "2025-03-12", "2025-03-08"];
        for rotation in 0..dates.len() {
            let mut order = dates.to_vec();
            order.rotate_left(rotation);
            let mut merged = Vec::new();
            for date in &order {
                merge_notices(&mut merged, vec![notice("Sport", "Bring a hat", date)]);
            }
            assert_eq!(merged.len(), 1);
            let notice = &merged[0];
            assert_eq!(notice.date, "2025-03-08");
            let got: HashSet<&str> = notice.dates.iter().map(String::as_str).collect();
            let want: HashSet<&str> = dates.iter().copied().collect();
            assert_eq!(got, want);
            assert_eq!(notice.dates.len(), want.len());
        }
    }

    #[test]
    fn notices_with_empty_content_key_on_preview() {
        let mut a = notice("Canteen", "", "2025-03-01");
        a.preview = "Closed".into();
        let mut b = notice("Canteen", "", "2025-03-02");
        b.preview = "Open".into();
        let mut notices = Vec::new();
        merge_notices(&mut notices, vec![a, b]);
        assert_eq!(notices.len(), 2);
    }

    #[test]
    fn calendar_merge_is_idempotent() {
        let events = vec![
            CalendarEvent::linked("Camp", "evt=1"),
            CalendarEvent::dated("Labour Day", "14", EventKind::Holiday),
        ];
        let mut merged = Vec::new();
        merge_calendar(&mut merged, events.clone());
        merge_calendar(&mut merged, events.clone());
        assert_eq!(merged, events);
    }

    #[test]
    fn calendar_keeps_same_title_on_different_dates() {
        let mut merged = vec![CalendarEvent::dated("Exams", "3", EventKind::Event)];
        merge_calendar(
            &mut merged,
            vec![CalendarEvent::dated("Exams", "4", EventKind::Event)],
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn class_views_fill_each_other() {
        let current = ClassInfo {
            course: "Maths".into(),
            class_code: "10MA1".into(),
            teacher: "Mr Smith".into(),
            ..ClassInfo::default()
        };
        let all = ClassInfo {
            course: "Mathematics".into(),
            class_code: "10MA1".into(),
            room: "G12".into(),
            lessons: 40,
            ..ClassInfo::default()
        };
        let mut classes = vec![current];
        merge_classes(&mut classes, vec![all]);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].course, "Maths");
        assert_eq!(classes[0].room, "G12");
        assert_eq!(classes[0].lessons, 40);
    }

    #[test]
    fn reports_stay_sorted_after_merge() {
        let mut reports = vec![report(2023, 2), report(2022, 1)];
        merge_reports(&mut reports, vec![report(2024, 1), report(2023, 1), report(2024, 2)]);
        for pair in reports.windows(2) {
            assert!(
                (pair[0].calendar_year, pair[0].semester) >= (pair[1].calendar_year, pair[1].semester)
            );
        }
        assert_eq!(reports.len(), 5);
    }

    #[test]
    fn fold_routes_each_page() {
        let mut record = AggregateRecord::new(UserInfo {
            user_id: 7,
            name: None,
        });
        let mut timetable = schoolportal_api::types::Timetable::default();
        timetable.week_a.push(TimetableEntry {
            day: Weekday::Monday,
            period: "P1".into(),
            course: "Maths".into(),
            class_code: "10A".into(),
            teacher: "Smith".into(),
            room: "G12".into(),
        });
        fold_into(&mut record, PageData::Timetable(timetable));
        fold_into(
            &mut record,
            PageData::Notices(vec![notice("Assembly", "Hall", "2025-03-15")]),
        );
        fold_into(
            &mut record,
            PageData::Notices(vec![notice("Assembly", "Hall", "2025-03-13")]),
        );
        assert_eq!(record.timetable.week_a.len(), 1);
        assert_eq!(record.notices.len(), 1);
        assert_eq!(record.notices[0].date, "2025-03-13");
    }
}
