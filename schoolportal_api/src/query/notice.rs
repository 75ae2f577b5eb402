use chrono::{Datelike, NaiveDate};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

use super::common::{append_encoded, PageQuery, Query};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Encodes a date the way the notices page expects its `date` parameter:
/// `D MMM YYYY` with an upper-case month, percent-encoded (`15%20MAR%202025`).
pub fn encode_notice_date(date: NaiveDate) -> String {
    let raw = format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    );
    utf8_percent_encode(&raw, NON_ALPHANUMERIC).to_string()
}

/// Query for the notices page, optionally filtered to a single day.
#[derive(Clone, Debug)]
pub struct NoticeQuery {
    pub common: PageQuery,
    pub date: Option<NaiveDate>,
}

impl NoticeQuery {
    pub fn new(common: PageQuery) -> Self {
        Self { common, date: None }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl Query for NoticeQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(date) = self.date {
            append_encoded(&mut url, "date", &encode_notice_date(date));
        }
        url
    }
}
