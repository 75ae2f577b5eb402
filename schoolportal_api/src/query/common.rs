//! Shared query infrastructure: the [`Query`] trait and the user-scoped [`PageQuery`].

use url::Url;

use crate::types::UserId;

/// Trait implemented by all page queries. Appends the query's parameters to a
/// page URL.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Parameters every portal page takes: the numeric user id, plus any fixed
/// extra pairs a page variant needs (e.g. `view=all` on the classes page).
#[derive(Clone, Debug)]
pub struct PageQuery {
    pub user_id: UserId,
    pub extra: Vec<(String, String)>,
}

impl PageQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            extra: Vec::new(),
        }
    }

    /// Adds a fixed `key=value` pair.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}

impl Query for PageQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("id", &self.user_id.to_string());
        for (key, value) in self.extra.iter() {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }
}

/// Appends an already percent-encoded `key=value` pair without re-encoding it.
pub(crate) fn append_encoded(url: &mut Url, key: &str, encoded_value: &str) {
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => {
            format!("{}&{}={}", existing, key, encoded_value)
        }
        _ => format!("{}={}", key, encoded_value),
    };
    url.set_query(Some(&query));
}
