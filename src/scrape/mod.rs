//! Scraping adapter for the remote content site
//!
//! This module turns remote pages into structured show/writer data:
//! - Building the HTTP client and fetching pages with error classification
//! - Extracting the embedded `__NEXT_DATA__` JSON payload modern pages
//!   carry, with plain-HTML fallbacks for pages that lack it
//! - The [`ScrapeAdapter`] trait the crawl driver and enrichment job
//!   consume, and its production implementation [`ImdbScraper`]

mod client;
mod imdb;
mod next_data;
mod show;
mod writer;

pub use client::{build_http_client, fetch_page};
pub use imdb::ImdbScraper;
pub use next_data::extract_next_data;
pub use show::{parse_show_detail, parse_show_writers};
pub use writer::{parse_writer_details, parse_writer_filmography};

use thiserror::Error;

/// A television show as discovered on the site
///
/// Identity is the site's stable `imdb_id`; a reference is never mutated
/// once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRef {
    pub imdb_id: String,
    pub title: String,
    pub year_start: Option<u16>,
    pub year_end: Option<u16>,
}

/// One writer's credit on one show
///
/// The same writer may hold several credits on a show under different
/// roles; each is a distinct credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterCredit {
    pub imdb_id: String,
    pub name: String,
    pub role: Option<String>,
    pub episode_count: Option<u32>,
}

/// A writer pending filmography expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterRef {
    pub imdb_id: String,
    pub name: String,
}

/// A writer's portrait and bio as scraped from their page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterDetails {
    pub imdb_id: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Errors raised while fetching a single remote page
///
/// These are always recovered locally by the callers: a failed fetch is
/// logged and treated as "no data", never aborting a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to extract data from {url}: {message}")]
    Parse { url: String, message: String },
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Interface between the crawl driver and the remote site
///
/// Implementations are network-bound and fallible; tests substitute a
/// scripted adapter. All methods take one site identifier and fetch one
/// logical page.
#[allow(async_fn_in_trait)]
pub trait ScrapeAdapter {
    /// Fetches title and year range for one show
    async fn fetch_show_detail(&self, show_id: &str) -> FetchResult<ShowRef>;

    /// Fetches the writing credits for one show
    async fn fetch_show_writers(&self, show_id: &str) -> FetchResult<Vec<WriterCredit>>;

    /// Fetches the TV-series shows a writer is credited on
    ///
    /// Only series-typed titles are returned; malformed or partial remote
    /// data degrades to an empty list, not an error.
    async fn fetch_writer_filmography(&self, writer_id: &str) -> FetchResult<Vec<ShowRef>>;

    /// Fetches a writer's portrait URL and bio text
    async fn fetch_writer_details(&self, writer_id: &str) -> FetchResult<WriterDetails>;
}
