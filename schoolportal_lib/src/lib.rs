//! Library layer for the school portal crawler: document scraping, cross-page
//! merging, and the paced crawl that produces one aggregate record.
//!
//! Wraps the `schoolportal_api` crate with retries, configuration, input
//! validation, and the page scrapers.

pub mod client;
pub mod config;
pub mod crawl;
pub mod document;
pub mod error;
pub mod extract;
pub mod merge;
pub mod scrape;
pub mod validation;

pub use schoolportal_api;
pub use schoolportal_api::types;
pub use schoolportal_api::{Query, SyncClient};

pub use client::{PortalClient, RetryConfig};
pub use config::{ConfigError, PagePaths, PortalConfig};
pub use crawl::{
    plan_pages, CrawlOutcome, CrawlProgress, CrawlReport, Crawler, PageDescriptor, PageFetcher,
    PageReport, PageStatus,
};
pub use document::{Element, HtmlDocument};
pub use error::PortalError;
pub use scrape::{scrape_page, PageData, PageKind, ScrapeContext};
