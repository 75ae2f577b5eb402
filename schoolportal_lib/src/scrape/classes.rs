use schoolportal_api::types::ClassInfo;

use super::{cell_texts, data_tables, table_rows};
use crate::document::Element;
use crate::extract::parse_int;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Course,
    Teacher,
    Lessons,
    Merits,
    Rolls,
    Absences,
    Room,
    Class,
}

/// Header keyword substrings per column, tried in order for every header cell.
/// `Class` comes last so headers such as "Class Teacher" resolve to the more
/// specific role.
const COLUMN_KEYWORDS: &[(Column, &[&str])] = &[
    (Column::Course, &["course", "subject"]),
    (Column::Teacher, &["teacher"]),
    (Column::Lessons, &["lesson"]),
    (Column::Merits, &["merit"]),
    (Column::Rolls, &["roll"]),
    (Column::Absences, &["absen"]),
    (Column::Room, &["room"]),
    (Column::Class, &["class"]),
];

/// Column positions resolved from one table's header row.
#[derive(Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    course: Option<usize>,
    class: Option<usize>,
    teacher: Option<usize>,
    lessons: Option<usize>,
    merits: Option<usize>,
    rolls: Option<usize>,
    absences: Option<usize>,
    room: Option<usize>,
}

impl ColumnMap {
    fn slot(&mut self, column: Column) -> &mut Option<usize> {
        match column {
            Column::Course => &mut self.course,
            Column::Class => &mut self.class,
            Column::Teacher => &mut self.teacher,
            Column::Lessons => &mut self.lessons,
            Column::Merits => &mut self.merits,
            Column::Rolls => &mut self.rolls,
            Column::Absences => &mut self.absences,
            Column::Room => &mut self.room,
        }
    }

    /// The first header cell matching a column claims it.
    fn resolve(headers: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            let header = header.to_lowercase();
            let matched = COLUMN_KEYWORDS.iter().find(|(_, keywords)| {
                keywords.iter().any(|keyword| header.contains(keyword))
            });
            if let Some((column, _)) = matched {
                let slot = map.slot(*column);
                if slot.is_none() {
                    *slot = Some(index);
                }
            }
        }
        map
    }

    fn extract(&self, texts: &[String]) -> Option<ClassInfo> {
        let course_index = self.course?;
        let course = texts.get(course_index)?.trim();
        if course.chars().count() <= 2 || course.contains("Total:") {
            return None;
        }
        let text = |index: Option<usize>| {
            index
                .and_then(|i| texts.get(i))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let count = |index: Option<usize>| {
            index.and_then(|i| texts.get(i)).map_or(0, |value| parse_int(value))
        };
        let class_code = match text(self.class) {
            code if code.is_empty() => course.to_string(),
            code => code,
        };
        Some(ClassInfo {
            course: course.to_string(),
            class_code,
            teacher: text(self.teacher),
            room: text(self.room),
            lessons: count(self.lessons),
            quick_merits: count(self.merits),
            rolls_marked: count(self.rolls),
            absences: count(self.absences),
        })
    }
}

fn is_classes_header(header_text: &str) -> bool {
    let lower = header_text.to_lowercase();
    (lower.contains("course") || lower.contains("subject"))
        && (lower.contains("class") || lower.contains("teacher"))
}

/// Reads class rows from every table whose header names a course column.
pub fn scrape_classes<E: Element>(root: &E) -> Vec<ClassInfo> {
    let mut classes = Vec::new();
    for table in data_tables(root, "table") {
        let rows = table_rows(&table);
        let Some((header, body)) = rows.split_first() else {
            continue;
        };
        if !is_classes_header(&header.text()) {
            continue;
        }
        let columns = ColumnMap::resolve(&cell_texts(header));
        if columns.course.is_none() {
            continue;
        }
        classes.extend(body.iter().filter_map(|row| columns.extract(&cell_texts(row))));
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::test_support::doc;

    #[test]
    fn subject_class_teacher_scenario() {
        let page = doc(
            "<table><tr><th>Subject</th><th>Class</th><th>Teacher</th></tr>\
             <tr><td>Maths</td><td>10A</td><td>Mr Smith</td></tr></table>",
        );
        assert_eq!(
            scrape_classes(&page.root()),
            vec![ClassInfo {
                course: "Maths".into(),
                class_code: "10A".into(),
                teacher: "Mr Smith".into(),
                ..ClassInfo::default()
            }]
        );
    }

    #[test]
    fn columns_are_resolved_by_header_not_position() {
        let page = doc(
            "<table><tr><th>Room</th><th>Lessons</th><th>Course</th><th>Quick Merits</th>\
             <th>Rolls Marked</th><th>Absences</th><th>Class Teacher</th></tr>\
             <tr><td>G12</td><td>38</td><td>Chemistry</td><td>3</td><td>36</td><td>2</td><td>Ms Lee</td></tr>\
             <tr><td></td><td></td><td>Total:</td><td></td><td></td><td></td><td></td></tr>\
             <tr><td>G1</td><td>1</td></tr></table>",
        );
        let classes = scrape_classes(&page.root());
        assert_eq!(
            classes,
            vec![ClassInfo {
                course: "Chemistry".into(),
                class_code: "Chemistry".into(),
                teacher: "Ms Lee".into(),
                room: "G12".into(),
                lessons: 38,
                quick_merits: 3,
                rolls_marked: 36,
                absences: 2,
            }]
        );
    }

    #[test]
    fn tables_without_course_header_are_skipped() {
        let page = doc(
            "<table><tr><th>Class</th><th>Teacher</th></tr><tr><td>10A</td><td>Smith</td></tr></table>",
        );
        assert!(scrape_classes(&page.root()).is_empty());
    }

    #[test]
    fn short_course_names_are_dropped() {
        let page = doc(
            "<table><tr><th>Course</th><th>Class</th></tr><tr><td>PE</td><td>10PE</td></tr></table>",
        );
        assert!(scrape_classes(&page.root()).is_empty());
    }
}
