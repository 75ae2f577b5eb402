use schoolportal_api::types::Grade;

use super::{cell_texts, table_rows};
use crate::document::Element;

#[derive(Default)]
struct GradeScan {
    subject: String,
    grades: Vec<Grade>,
}

/// Reads assessment results.
///
/// Headings and tables are visited in document order; each heading names the
/// subject for every table after it until the next heading. The first row of
/// each table is its header.
pub fn scrape_grades<E: Element>(root: &E) -> Vec<Grade> {
    root.select("h1, h2, h3, h4, h5, h6, table")
        .iter()
        .fold(GradeScan::default(), |mut scan, element| {
            if element.tag_name() == "table" {
                if element.select("table").is_empty() {
                    let subject = scan.subject.clone();
                    scan.grades.extend(grade_rows(element, &subject));
                }
            } else {
                scan.subject = element.text();
            }
            scan
        })
        .grades
}

fn grade_rows<E: Element>(table: &E, subject: &str) -> Vec<Grade> {
    table_rows(table)
        .iter()
        .skip(1)
        .filter_map(|row| {
            let texts = cell_texts(row);
            if texts.len() < 2 {
                return None;
            }
            let task = texts[0].clone();
            if !is_valid_task(&task) {
                return None;
            }
            let date = if texts.len() >= 3 {
                texts[1].clone()
            } else {
                String::new()
            };
            Some(Grade {
                subject: subject.to_string(),
                task,
                result: texts[texts.len() - 1].clone(),
                date,
            })
        })
        .collect()
}

/// Between 3 and 99 characters, and not a `Year:` summary row.
pub(crate) fn is_valid_task(task: &str) -> bool {
    let len = task.chars().count();
    len > 2 && len < 100 && !task.contains("Year:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::test_support::doc;

    #[test]
    fn tables_take_the_nearest_preceding_heading() {
        let page = doc(
            r#"<h2>English</h2>
               <table><tr><th>Task</th><th>Date</th><th>Result</th></tr>
                 <tr><td>Persuasive essay</td><td>12/03/2025</td><td>A</td></tr></table>
               <table><tr><th>Task</th><th>Result</th></tr>
                 <tr><td>Reading log</td><td>B+</td></tr></table>
               <h2>Maths</h2>
               <table><tr><th>Task</th><th>Date</th><th>Result</th></tr>
                 <tr><td>Algebra test</td><td>14/03/2025</td><td>87%</td></tr></table>"#,
        );
        let grades = scrape_grades(&page.root());
        assert_eq!(grades.len(), 3);
        assert_eq!(
            grades[0],
            Grade {
                subject: "English".into(),
                task: "Persuasive essay".into(),
                result: "A".into(),
                date: "12/03/2025".into(),
            }
        );
        assert_eq!(grades[1].subject, "English");
        assert_eq!(grades[1].date, "");
        assert_eq!(grades[1].result, "B+");
        assert_eq!(grades[2].subject, "Maths");
    }

    #[test]
    fn summary_and_short_rows_are_rejected() {
        let page = doc(
            r#"<h3>Science</h3>
               <table><tr><th>Task</th><th>Result</th></tr>
                 <tr><td>Year: 10 average</td><td>B</td></tr>
                 <tr><td>Qz</td><td>A</td></tr>
                 <tr><td>Lab report</td></tr>
                 <tr><td>Lab report</td><td>A-</td></tr></table>"#,
        );
        let grades = scrape_grades(&page.root());
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].task, "Lab report");
    }

    #[test]
    fn task_length_bounds() {
        assert!(!is_valid_task("ab"));
        assert!(is_valid_task("abc"));
        assert!(is_valid_task(&"x".repeat(99)));
        assert!(!is_valid_task(&"x".repeat(100)));
        assert!(!is_valid_task("Year: 9"));
    }

    #[test]
    fn layout_tables_do_not_duplicate_rows() {
        let page = doc(
            r#"<table><tr><td>
                 <h3>History</h3>
                 <table><tr><th>Task</th><th>Result</th></tr><tr><td>Source study</td><td>C</td></tr></table>
               </td></tr></table>"#,
        );
        let grades = scrape_grades(&page.root());
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].subject, "History");
    }
}
