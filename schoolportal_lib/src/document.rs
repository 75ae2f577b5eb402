//! Minimal document-tree capability the page scrapers are written against.
//!
//! Scrapers only ever select elements, read trimmed text, read attributes and
//! step to the next sibling, so any HTML parser can back them. The
//! [`HtmlDocument`] implementation uses `scraper`.

use scraper::{ElementRef, Html, Selector};

/// An element of a parsed page.
pub trait Element: Clone {
    /// Descendants matching a CSS selector, in document order, never the
    /// element itself. An invalid selector matches nothing.
    fn select(&self, pattern: &str) -> Vec<Self>;

    /// Direct child elements.
    fn children(&self) -> Vec<Self>;

    /// Text content with runs of whitespace collapsed and the ends trimmed.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    /// The next sibling that is an element, skipping text and comments.
    fn next_sibling(&self) -> Option<Self>;

    fn inner_html(&self) -> String;

    /// Lower-case tag name.
    fn tag_name(&self) -> String;
}

/// A parsed page. Owns the tree; hand [`HtmlDocument::root`] to the scrapers.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn root(&self) -> HtmlElement<'_> {
        HtmlElement(self.html.root_element())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HtmlElement<'a>(ElementRef<'a>);

impl<'a> Element for HtmlElement<'a> {
    fn select(&self, pattern: &str) -> Vec<Self> {
        match Selector::parse(pattern) {
            Ok(selector) => self
                .0
                .select(&selector)
                .filter(|found| found.id() != self.0.id())
                .map(HtmlElement)
                .collect(),
            Err(e) => {
                tracing::warn!("invalid selector {:?}: {:?}", pattern, e);
                Vec::new()
            }
        }
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .map(HtmlElement)
            .collect()
    }

    fn text(&self) -> String {
        collapse_whitespace(&self.0.text().collect::<String>())
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }

    fn next_sibling(&self) -> Option<Self> {
        self.0
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(HtmlElement)
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn tag_name(&self) -> String {
        self.0.value().name().to_ascii_lowercase()
    }
}

/// Plain text of an HTML fragment, e.g. markup stored in an attribute.
pub fn fragment_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    collapse_whitespace(&fragment.root_element().text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_collapsed_and_trimmed() {
        let doc = HtmlDocument::parse("<p>\n  Week\u{a0}  A \n</p>");
        let p = &doc.root().select("p")[0];
        assert_eq!(p.text(), "Week A");
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let doc = HtmlDocument::parse("<p>x</p>");
        assert!(doc.root().select("p[[").is_empty());
    }

    #[test]
    fn next_sibling_skips_text_nodes() {
        let doc = HtmlDocument::parse("<h3>Title</h3>\n some text \n<div>Body</div>");
        let h3 = &doc.root().select("h3")[0];
        let sibling = h3.next_sibling().unwrap();
        assert_eq!(sibling.tag_name(), "div");
        assert_eq!(sibling.text(), "Body");
    }

    #[test]
    fn children_are_direct_only() {
        let doc = HtmlDocument::parse("<table id='t'><tr><td><table><tr><td>x</td></tr></table></td></tr></table>");
        let table = &doc.root().select("table#t")[0];
        let bodies = table.children();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].tag_name(), "tbody");
    }

    #[test]
    fn fragment_text_strips_tags() {
        assert_eq!(fragment_text("<b>Bring</b> a <i>hat</i>"), "Bring a hat");
    }

    #[test]
    fn attr_reads_raw_value() {
        let doc = HtmlDocument::parse("<a title='<p>hi</p>' href='#'>x</a>");
        let a = &doc.root().select("a")[0];
        assert_eq!(a.attr("title").as_deref(), Some("<p>hi</p>"));
        assert_eq!(a.attr("data"), None);
    }

    #[test]
    fn select_excludes_the_element_itself() {
        let doc = HtmlDocument::parse("<table id='t'><tr><td>x</td></tr></table>");
        let table = &doc.root().select("table#t")[0];
        assert!(table.select("table").is_empty());
        assert_eq!(table.select("td").len(), 1);
    }
}
