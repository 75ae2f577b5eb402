use serde::{Deserialize, Serialize};

/// A notice from the daily notices board.
///
/// The same notice usually appears on several date-filtered pages. `date` is
/// the earliest date it was seen on and `dates` lists every date it was seen
/// on, in the order they were encountered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub title: String,
    pub content: String,
    pub content_html: String,
    pub preview: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    /// ISO `YYYY-MM-DD` of the day the notice was scraped.
    pub current_day: String,
    #[serde(default)]
    pub dates: Vec<String>,
}

impl Notice {
    /// Key used to recognise the same notice across pages: `title::content`,
    /// or `title::preview` when the content is empty.
    pub fn identity_key(&self) -> String {
        let body = if self.content.is_empty() {
            &self.preview
        } else {
            &self.content
        };
        format!("{}::{}", self.title, body)
    }
}
