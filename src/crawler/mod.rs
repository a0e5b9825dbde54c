//! Crawler module for expanding the show/writer graph
//!
//! This module contains the crawl control logic:
//! - The frontier queues of pending show and writer fetches
//! - The dedup tracker preventing redundant fetches within a run
//! - The driver that alternates show drains and writer expansions until
//!   a stop condition is met

mod driver;
mod frontier;
mod tracker;

pub use driver::{CrawlDriver, CrawlOutcome, CrawlSummary};
pub use frontier::Frontier;
pub use tracker::DedupTracker;

use crate::config::CrawlConfig;
use crate::scrape::ScrapeAdapter;
use crate::storage::Store;
use crate::Result;

/// Runs one complete graph expansion
///
/// Seeds the run from the store, crawls until the configured target show
/// count is reached, the frontier is exhausted, or the iteration cap is
/// hit, and returns a summary of the stored graph.
pub async fn expand_network<S: Store, A: ScrapeAdapter>(
    store: &S,
    adapter: &A,
    config: &CrawlConfig,
) -> Result<CrawlSummary> {
    CrawlDriver::new(store, adapter, config).run().await
}
