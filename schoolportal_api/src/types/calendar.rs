use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Holiday,
    Event,
}

/// A calendar entry.
///
/// Linked events carry `title` and the portal's `data` payload; entries read
/// from calendar cells carry a `date` fragment, `title` and `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
}

impl CalendarEvent {
    pub fn linked(title: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: None,
            data: Some(data.into()),
            kind: None,
        }
    }

    pub fn dated(title: impl Into<String>, date: impl Into<String>, kind: EventKind) -> Self {
        Self {
            title: title.into(),
            date: Some(date.into()),
            data: None,
            kind: Some(kind),
        }
    }

    /// `(title, date)`; undated events use their data payload in the date slot.
    pub fn dedup_key(&self) -> (String, String) {
        let date = self
            .date
            .as_deref()
            .or(self.data.as_deref())
            .unwrap_or_default();
        (self.title.clone(), date.to_string())
    }
}
