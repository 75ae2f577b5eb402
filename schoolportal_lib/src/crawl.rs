//! Crawl orchestration: plan the page list, fetch each page in order with a
//! pause in between, scrape it, and fold the result into one record.
//!
//! Only a missing user id stops a crawl. Every other failure is recorded in
//! the [`CrawlReport`] and the crawl carries on with the next page.

use std::future::Future;

use chrono::{Days, NaiveDate, Utc};
use schoolportal_api::types::{AggregateRecord, UserId, UserInfo};
use schoolportal_api::{CalendarQuery, Client, NoticeQuery, PageQuery};
use serde::Serialize;

use crate::config::PortalConfig;
use crate::document::HtmlDocument;
use crate::error::PortalError;
use crate::merge::fold_into;
use crate::scrape::{scrape_page, scrape_user_id, scrape_user_name, PageData, PageKind, ScrapeContext};
use crate::validation::{validate_base_url, validate_view};

/// Source of page markup. Implemented by [`crate::PortalClient`]; tests
/// substitute canned pages.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, PortalError>> + Send;
}

/// One page of the crawl plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub name: String,
    pub kind: PageKind,
    pub url: String,
    /// Day a date-filtered notices page is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_date: Option<NaiveDate>,
}

impl PageDescriptor {
    fn new(name: impl Into<String>, kind: PageKind, url: url::Url) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.to_string(),
            notice_date: None,
        }
    }
}

/// The ordered page list for one user: the single-fetch pages, one classes
/// page per configured view, the calendar month window around the anchor
/// month, then the notices pages for each day of the window except today.
pub fn plan_pages(
    urls: &Client,
    config: &PortalConfig,
    user_id: UserId,
    today: NaiveDate,
) -> Result<Vec<PageDescriptor>, PortalError> {
    let paths = &config.paths;
    let common = PageQuery::new(user_id);
    let mut pages = vec![
        PageDescriptor::new(
            "timetable",
            PageKind::Timetable,
            urls.page_url(&paths.timetable, &common)?,
        ),
        PageDescriptor::new(
            "notices",
            PageKind::Notices,
            urls.page_url(&paths.notices, &NoticeQuery::new(common.clone()))?,
        ),
        PageDescriptor::new("grades", PageKind::Grades, urls.page_url(&paths.grades, &common)?),
        PageDescriptor::new(
            "attendance",
            PageKind::Attendance,
            urls.page_url(&paths.attendance, &common)?,
        ),
        PageDescriptor::new("reports", PageKind::Reports, urls.page_url(&paths.reports, &common)?),
    ];

    for view in &config.classes_views {
        let view = validate_view(view)?;
        let query = common.clone().with_param("view", &view);
        pages.push(PageDescriptor::new(
            format!("classes ({})", view),
            PageKind::Classes,
            urls.page_url(&paths.classes, &query)?,
        ));
    }

    let (first_month, last_month) = calendar_window(config)?;
    for month in first_month..=last_month {
        let query = CalendarQuery::new(common.clone(), month);
        pages.push(PageDescriptor::new(
            format!("calendar (month {})", month),
            PageKind::Calendar,
            urls.page_url(&paths.calendar, &query)?,
        ));
    }

    let window = config.notice_window_days;
    if window < 0 {
        return Err(PortalError::InvalidInput(format!(
            "notice_window_days must not be negative (got {})",
            window
        )));
    }
    for offset in (-window..=window).filter(|offset| *offset != 0) {
        let Some(date) = shift_days(today, offset) else {
            continue;
        };
        let query = NoticeQuery::new(common.clone()).with_date(date);
        let mut page = PageDescriptor::new(
            format!("notices ({})", date),
            PageKind::Notices,
            urls.page_url(&paths.notices, &query)?,
        );
        page.notice_date = Some(date);
        pages.push(page);
    }

    Ok(pages)
}

/// First and last calendar month values around the configured anchor.
fn calendar_window(config: &PortalConfig) -> Result<(i64, i64), PortalError> {
    let anchor = config.calendar_anchor_month;
    let first = anchor.checked_sub(config.calendar_months_before);
    let last = anchor.checked_add(config.calendar_months_after);
    match (first, last) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(PortalError::InvalidInput(format!(
            "calendar window {} -{}/+{} is out of range",
            anchor, config.calendar_months_before, config.calendar_months_after
        ))),
    }
}

fn shift_days(day: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset < 0 {
        day.checked_sub_days(days)
    } else {
        day.checked_add_days(days)
    }
}

/// How one page went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum PageStatus {
    /// Fetched and scraped; `items` is how many records the page yielded.
    Ok { items: usize },
    /// Fetch failed or timed out; the page contributed nothing.
    Failed { reason: String },
}

impl PageStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, PageStatus::Ok { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub name: String,
    pub kind: PageKind,
    pub url: String,
    #[serde(flatten)]
    pub status: PageStatus,
}

/// Per-page bookkeeping for one crawl, in crawl order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub pages: Vec<PageReport>,
}

impl CrawlReport {
    pub fn succeeded(&self) -> usize {
        self.pages.iter().filter(|page| page.status.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(|page| !page.status.is_ok())
    }
}

/// Sent to the progress observer after every page.
#[derive(Clone, Debug)]
pub struct CrawlProgress<'a> {
    /// 1-based position in the plan.
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
    pub status: &'a PageStatus,
}

#[derive(Clone, Debug)]
pub struct CrawlOutcome {
    pub record: AggregateRecord,
    pub report: CrawlReport,
}

/// Runs crawls against one portal.
pub struct Crawler<F> {
    fetcher: F,
    urls: Client,
    config: PortalConfig,
    today: NaiveDate,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, config: PortalConfig) -> Result<Self, PortalError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| PortalError::InvalidInput("no portal base URL configured".to_string()))?;
        let urls = Client::new(&validate_base_url(base_url)?);
        Ok(Self {
            fetcher,
            urls,
            config,
            today: crate::extract::today(),
        })
    }

    /// Overrides the crawl's notion of today (notice window and stamping).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn plan(&self, user_id: UserId) -> Result<Vec<PageDescriptor>, PortalError> {
        plan_pages(&self.urls, &self.config, user_id, self.today)
    }

    /// The configured user id, or the one linked from the landing page.
    pub async fn resolve_user(&self) -> Result<UserInfo, PortalError> {
        if let Some(user_id) = self.config.user_id {
            return Ok(UserInfo {
                user_id,
                name: None,
            });
        }

        let url = self.urls.plain_url(&self.config.paths.landing)?;
        let markup = match self.fetch_with_timeout(url.as_str()).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::error!("Failed to load landing page {}: {}", url, e);
                return Err(PortalError::MissingUserId);
            }
        };
        let (user_id, name) = {
            let doc = HtmlDocument::parse(&markup);
            let root = doc.root();
            (scrape_user_id(&root), scrape_user_name(&root))
        };
        match user_id {
            Some(user_id) => {
                tracing::info!("Resolved user id {} from landing page", user_id);
                Ok(UserInfo { user_id, name })
            }
            None => Err(PortalError::MissingUserId),
        }
    }

    /// Resolves the user, then crawls every planned page.
    pub async fn run<O>(&self, observer: O) -> Result<CrawlOutcome, PortalError>
    where
        O: FnMut(&CrawlProgress<'_>),
    {
        let user = self.resolve_user().await?;
        let pages = self.plan(user.user_id)?;
        Ok(self.crawl_pages(user, &pages, observer).await)
    }

    /// Fetches, scrapes and folds `pages` in order. Never fails: a page that
    /// cannot be fetched is recorded as failed and skipped.
    pub async fn crawl_pages<O>(
        &self,
        user: UserInfo,
        pages: &[PageDescriptor],
        mut observer: O,
    ) -> CrawlOutcome
    where
        O: FnMut(&CrawlProgress<'_>),
    {
        let delay = self.config.request_delay();
        let total = pages.len();
        let mut record = AggregateRecord::new(user);
        let mut report = CrawlReport::default();
        tracing::info!("Starting crawl of {} pages for user {}", total, record.user.user_id);

        for (i, page) in pages.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let status = match self.fetch_with_timeout(&page.url).await {
                Ok(markup) => {
                    let data = scrape_markup(page, &markup, self.today);
                    let items = data.item_count();
                    fold_into(&mut record, data);
                    tracing::debug!("Page {} yielded {} items", page.name, items);
                    PageStatus::Ok { items }
                }
                Err(e) => {
                    tracing::warn!("Skipping page {} ({}): {}", page.name, page.url, e);
                    PageStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            observer(&CrawlProgress {
                index: i + 1,
                total,
                name: &page.name,
                status: &status,
            });
            report.pages.push(PageReport {
                name: page.name.clone(),
                kind: page.kind,
                url: page.url.clone(),
                status,
            });
        }

        record.last_updated = Utc::now();
        tracing::info!(
            "Crawl finished: {}/{} pages succeeded",
            report.succeeded(),
            total
        );
        CrawlOutcome { record, report }
    }

    async fn fetch_with_timeout(&self, url: &str) -> Result<String, PortalError> {
        let limit = self.config.fetch_timeout();
        match tokio::time::timeout(limit, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(PortalError::Timeout(limit)),
        }
    }
}

/// Parses one page and runs its scraper. The parsed tree never outlives this
/// call.
fn scrape_markup(page: &PageDescriptor, markup: &str, today: NaiveDate) -> PageData {
    let doc = HtmlDocument::parse(markup);
    let ctx = ScrapeContext::new(today)
        .with_page_url(&page.url)
        .with_notice_date(page.notice_date);
    scrape_page(page.kind, &doc.root(), &ctx)
}
