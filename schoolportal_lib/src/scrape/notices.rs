use std::collections::HashSet;

use chrono::NaiveDate;
use schoolportal_api::types::Notice;
use url::Url;

use super::ScrapeContext;
use crate::document::{fragment_text, Element};
use crate::extract::{parse_notice_date_param, truncate_preview};

/// Reads the notices on one notices page.
///
/// Two passes: tooltip anchors (title in the link text, body in the `title`
/// attribute), then headings followed by a body element. A heading whose title
/// was already taken from a tooltip is skipped.
pub fn scrape_notices<E: Element>(root: &E, ctx: &ScrapeContext) -> Vec<Notice> {
    let date = notice_date(ctx).format("%Y-%m-%d").to_string();
    let current_day = ctx.today.format("%Y-%m-%d").to_string();
    let stamp = |title: String, content: String, content_html: String| Notice {
        preview: truncate_preview(&content),
        title,
        content,
        content_html,
        date: date.clone(),
        current_day: current_day.clone(),
        dates: vec![date.clone()],
    };

    let mut notices = Vec::new();
    let mut tooltip_titles = HashSet::new();

    for anchor in root.select("a[title]") {
        if !is_tooltip_anchor(&anchor) {
            continue;
        }
        let title = anchor.text();
        let content_html = anchor.attr("title").unwrap_or_default().trim().to_string();
        if title.is_empty() || content_html.is_empty() {
            continue;
        }
        let content = fragment_text(&content_html);
        tooltip_titles.insert(title.clone());
        notices.push(stamp(title, content, content_html));
    }

    for heading in root.select("h2, h3, h4") {
        let title = heading.text();
        if title.is_empty() || tooltip_titles.contains(&title) {
            continue;
        }
        let Some(body) = heading.next_sibling() else {
            continue;
        };
        if matches!(body.tag_name().as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
            continue;
        }
        let content = body.text();
        if content.is_empty() {
            continue;
        }
        notices.push(stamp(title, content, body.inner_html().trim().to_string()));
    }

    notices
}

/// The day the page lists notices for: the explicit override, else the page
/// URL's `date` parameter, else today.
fn notice_date(ctx: &ScrapeContext) -> NaiveDate {
    ctx.notice_date
        .or_else(|| {
            let url = Url::parse(ctx.page_url.as_deref()?).ok()?;
            let raw = url
                .query_pairs()
                .find(|(key, _)| key.eq_ignore_ascii_case("date"))
                .map(|(_, value)| value.into_owned())?;
            parse_notice_date_param(&raw)
        })
        .unwrap_or(ctx.today)
}

/// Tooltip anchors pop up their `title` instead of navigating.
fn is_tooltip_anchor<E: Element>(anchor: &E) -> bool {
    match anchor.attr("href") {
        None => true,
        Some(href) => {
            let href = href.trim();
            href.is_empty()
                || href.starts_with('#')
                || href.to_ascii_lowercase().starts_with("javascript:")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::test_support::{day, doc};

    fn ctx() -> ScrapeContext {
        ScrapeContext::new(day(2025, 3, 15))
    }

    #[test]
    fn tooltip_anchors_become_notices() {
        let page = doc(
            r##"<a href="#" title="&lt;p&gt;Bring a &lt;b&gt;hat&lt;/b&gt;&lt;/p&gt;">Swimming carnival</a>
                <a href="/portal/home.asp" title="Home">Home</a>"##,
        );
        let notices = scrape_notices(&page.root(), &ctx());
        assert_eq!(notices.len(), 1);
        let notice = &notices[0];
        assert_eq!(notice.title, "Swimming carnival");
        assert_eq!(notice.content, "Bring a hat");
        assert_eq!(notice.content_html, "<p>Bring a <b>hat</b></p>");
        assert_eq!(notice.preview, "Bring a hat");
        assert_eq!(notice.date, "2025-03-15");
        assert_eq!(notice.current_day, "2025-03-15");
        assert_eq!(notice.dates, vec!["2025-03-15"]);
    }

    #[test]
    fn headings_pair_with_next_sibling_and_skip_tooltip_titles() {
        let page = doc(
            r#"<a title="Details">Band practice</a>
               <h3>Band practice</h3><div>Duplicate body</div>
               <h3>Library closed</h3><div>The library is <i>closed</i> on Friday.</div>
               <h3>Empty</h3>"#,
        );
        let notices = scrape_notices(&page.root(), &ctx());
        let titles: Vec<_> = notices.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Band practice", "Library closed"]);
        assert_eq!(notices[1].content, "The library is closed on Friday.");
        assert_eq!(notices[1].content_html, "The library is <i>closed</i> on Friday.");
    }

    #[test]
    fn notice_date_override_is_stamped() {
        let page = doc("<h3>Excursion</h3><p>Permission notes due.</p>");
        let ctx = ctx().with_notice_date(Some(day(2025, 3, 10)));
        let notices = scrape_notices(&page.root(), &ctx);
        assert_eq!(notices[0].date, "2025-03-10");
        assert_eq!(notices[0].dates, vec!["2025-03-10"]);
        assert_eq!(notices[0].current_day, "2025-03-15");
    }

    #[test]
    fn date_parameter_in_page_url_is_used() {
        let page = doc("<h3>Excursion</h3><p>Permission notes due.</p>");
        let ctx = ctx().with_page_url("https://portal.example.org/portal/notices.asp?id=7&date=12%20MAR%202025");
        assert_eq!(scrape_notices(&page.root(), &ctx)[0].date, "2025-03-12");

        let ctx = ScrapeContext::new(day(2025, 3, 15))
            .with_page_url("https://portal.example.org/portal/notices.asp?id=7&date=someday");
        assert_eq!(scrape_notices(&page.root(), &ctx)[0].date, "2025-03-15");
    }

    #[test]
    fn long_content_gets_a_preview() {
        let body = "word ".repeat(60);
        let page = doc(&format!("<h3>Long</h3><p>{}</p>", body));
        let notices = scrape_notices(&page.root(), &ctx());
        assert_eq!(notices[0].preview.chars().count(), 203);
        assert!(notices[0].preview.ends_with("..."));
    }

    #[test]
    fn page_without_notices() {
        let page = doc("<p>There are no notices today.</p>");
        assert!(scrape_notices(&page.root(), &ctx()).is_empty());
    }
}
