use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use schoolportal_api::types::{CalendarEvent, EventKind};

use crate::document::Element;

static RE_DATE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}(?:[/.-]\d{1,2}(?:[/.-]\d{2,4})?)?").expect("invalid regex: date fragment")
});

static RE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--\s*(.+?)\s*--").expect("invalid regex: label"));

/// Reads events from one calendar month page, without duplicates.
///
/// Linked events come from event anchors; holidays and other marked days come
/// from the month grid's cells, whose text reads like `14 -- Labour Day --`.
pub fn scrape_calendar<E: Element>(root: &E) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for anchor in root.select("a[class*='event'], a[class*='Event'], a[data]") {
        let title = anchor.text();
        if is_placeholder(&title) {
            continue;
        }
        let data = anchor
            .attr("data")
            .or_else(|| anchor.attr("href"))
            .unwrap_or_default();
        events.push(CalendarEvent::linked(title, data));
    }

    for cell in root.select("td") {
        if !cell.select("td").is_empty() {
            continue;
        }
        let text = cell.text();
        if !(text.contains("Holidays") || text.contains("Event")) {
            continue;
        }
        let Some(label) = RE_LABEL.captures(&text) else {
            continue;
        };
        // The date sits before the label; digits inside the label are part of the title.
        let before_label = label.get(0).map_or("", |m| &text[..m.start()]);
        let Some(date) = RE_DATE_FRAGMENT.find(before_label) else {
            continue;
        };
        let kind = if text.contains("Holiday") {
            EventKind::Holiday
        } else {
            EventKind::Event
        };
        events.push(CalendarEvent::dated(&label[1], date.as_str(), kind));
    }

    dedup_events(events)
}

/// Keeps the first event for every `(title, date)` key.
pub(crate) fn dedup_events(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.dedup_key()))
        .collect()
}

/// Separator text such as `--` or an empty cell link.
fn is_placeholder(text: &str) -> bool {
    text.chars().all(|c| c == '-' || c.is_whitespace())
}
