use std::sync::LazyLock;

use regex::Regex;
use schoolportal_api::types::UserId;

use crate::document::Element;

static RE_USER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=(\d+)").expect("invalid regex: user id"));

static RE_WELCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Welcome,?\s+([^!,.<]+?)\s*(?:[!,.]|$)").expect("invalid regex: welcome")
});

/// The student's user id, taken from the first landing-page link that carries
/// an `id` query parameter.
pub fn scrape_user_id<E: Element>(root: &E) -> Option<UserId> {
    root.select("a[href]").into_iter().find_map(|anchor| {
        let href = anchor.attr("href")?;
        RE_USER_ID
            .captures(&href)
            .and_then(|caps| caps[1].parse::<UserId>().ok())
    })
}

/// The student's display name from the landing page, if shown.
pub fn scrape_user_name<E: Element>(root: &E) -> Option<String> {
    let labelled = root
        .select(".username, .studentname")
        .into_iter()
        .map(|element| element.text())
        .find(|text| !text.is_empty());
    if labelled.is_some() {
        return labelled;
    }

    let page_text = root.text();
    RE_WELCOME
        .captures(&page_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}
