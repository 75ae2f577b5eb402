use schoolportal_lib::types::AggregateRecord;
use schoolportal_lib::{CrawlReport, PageDescriptor, PageStatus};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Page")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "URL")]
    url: String,
}

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Page")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Items")]
    items: String,
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    section: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

fn build_plan_rows(pages: &[PageDescriptor]) -> Vec<PlanRow> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| PlanRow {
            index: i + 1,
            name: page.name.clone(),
            kind: page.kind.to_string(),
            url: page.url.clone(),
        })
        .collect()
}

fn build_page_rows(report: &CrawlReport) -> Vec<PageRow> {
    report
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let (status, items) = match &page.status {
                PageStatus::Ok { items } => ("ok".to_string(), items.to_string()),
                PageStatus::Failed { reason } => (format!("failed: {}", reason), "-".to_string()),
            };
            PageRow {
                index: i + 1,
                name: page.name.clone(),
                status,
                items,
            }
        })
        .collect()
}

fn build_section_rows(record: &AggregateRecord) -> Vec<SectionRow> {
    vec![
        SectionRow {
            section: "Timetable (Week A)",
            count: record.timetable.week_a.len(),
        },
        SectionRow {
            section: "Timetable (Week B)",
            count: record.timetable.week_b.len(),
        },
        SectionRow {
            section: "Notices",
            count: record.notices.len(),
        },
        SectionRow {
            section: "Grades",
            count: record.grades.len(),
        },
        SectionRow {
            section: "Attendance (yearly)",
            count: record.attendance.yearly.len(),
        },
        SectionRow {
            section: "Attendance (classes)",
            count: record.attendance.subjects.len(),
        },
        SectionRow {
            section: "Reports",
            count: record.reports.len(),
        },
        SectionRow {
            section: "Classes",
            count: record.classes.len(),
        },
        SectionRow {
            section: "Calendar",
            count: record.calendar.len(),
        },
    ]
}

pub fn print_plan_table(pages: &[PageDescriptor]) {
    let mut table = Table::new(build_plan_rows(pages));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_crawl_table(record: &AggregateRecord, report: &CrawlReport) {
    let mut pages = Table::new(build_page_rows(report));
    pages.with(Style::rounded());
    println!("{}", pages);

    let mut sections = Table::new(build_section_rows(record));
    sections.with(Style::rounded());
    println!("{}", sections);

    match &record.user.name {
        Some(name) => println!("User: {} ({})", name, record.user.user_id),
        None => println!("User: {}", record.user.user_id),
    }
    println!(
        "{}/{} pages succeeded, last updated {}",
        report.succeeded(),
        report.pages.len(),
        record.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// The one-time login token in a sync reply, if the endpoint sent one.
pub fn login_token(reply: &serde_json::Value) -> Option<&str> {
    ["token", "loginToken"]
        .iter()
        .find_map(|key| reply.get(key).and_then(serde_json::Value::as_str))
}
