use url::Url;

use super::common::{PageQuery, Query};

/// Query for one calendar month.
///
/// The portal addresses months by a single opaque integer; the crawl derives
/// values relative to a configured anchor and never decodes them.
#[derive(Clone, Debug)]
pub struct CalendarQuery {
    pub common: PageQuery,
    pub month: i64,
}

impl CalendarQuery {
    pub fn new(common: PageQuery, month: i64) -> Self {
        Self { common, month }
    }
}

impl Query for CalendarQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        url.query_pairs_mut()
            .append_pair("m", &self.month.to_string());
        url
    }
}
