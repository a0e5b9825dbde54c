//! Crawl driver - the graph-expansion control loop
//!
//! The driver owns the run's in-memory state (dedup sets and the two
//! frontier queues) and alternates between draining the show queue and
//! popping a single writer for filmography expansion, until the target
//! show count is reached, the frontier is exhausted, or the iteration
//! safety cap is hit. State never outlives the run; each run re-seeds
//! itself from the store.

use crate::config::CrawlConfig;
use crate::crawler::frontier::Frontier;
use crate::crawler::tracker::DedupTracker;
use crate::scrape::{ScrapeAdapter, ShowRef, WriterRef};
use crate::storage::{OverlapRecord, Store};
use crate::{Result, TeleplayError};
use std::time::Duration;

/// How a crawl run came to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The store holds at least the requested number of shows
    TargetReached,

    /// Both queues ran dry before the target was met
    FrontierExhausted,

    /// The iteration safety cap stopped the run early; not an error, but
    /// the result is incomplete
    IterationCapReached,
}

/// Totals and overlap report produced at the end of every run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub outcome: CrawlOutcome,
    pub shows_total: u64,
    pub writers_total: u64,
    pub writers_with_overlap: u64,
    /// Writers on more than one show, most-connected first
    pub top_overlaps: Vec<OverlapRecord>,
}

/// The crawl control loop over a store and a scrape adapter
///
/// Strictly sequential: one fetch in flight at a time, with an
/// unconditional delay between requests.
pub struct CrawlDriver<'a, S, A> {
    store: &'a S,
    adapter: &'a A,
    config: &'a CrawlConfig,
    tracker: DedupTracker,
    frontier: Frontier,
}

impl<'a, S: Store, A: ScrapeAdapter> CrawlDriver<'a, S, A> {
    /// Creates a driver with fresh in-memory state
    pub fn new(store: &'a S, adapter: &'a A, config: &'a CrawlConfig) -> Self {
        Self {
            store,
            adapter,
            config,
            tracker: DedupTracker::new(),
            frontier: Frontier::new(),
        }
    }

    /// Runs one expansion to completion and returns its summary
    ///
    /// The run always completes: fetch failures are logged and treated as
    /// missing data, and the summary reports which stop condition ended
    /// the run.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        self.tracker.seed_shows(self.store.existing_show_ids()?);
        tracing::info!(
            "Starting with {} shows already stored",
            self.tracker.shows_scraped()
        );

        if self.target_reached() {
            tracing::info!(
                "Already have {} shows, target is {}",
                self.tracker.shows_scraped(),
                self.config.target_shows
            );
            return self.summarize(CrawlOutcome::TargetReached);
        }

        let seed_writers = self
            .store
            .eligible_seed_writers(self.config.min_episodes)?;
        tracing::info!(
            "Seeded {} writers with {}+ episode credits",
            seed_writers.len(),
            self.config.min_episodes
        );
        for writer in seed_writers {
            self.frontier.push_writer(writer);
        }

        let outcome = self.crawl_loop().await?;
        self.summarize(outcome)
    }

    async fn crawl_loop(&mut self) -> Result<CrawlOutcome> {
        let mut iteration = 0;

        loop {
            if self.target_reached() {
                return Ok(CrawlOutcome::TargetReached);
            }
            if iteration >= self.config.max_iterations {
                tracing::warn!(
                    "Iteration cap of {} reached with {} of {} shows",
                    self.config.max_iterations,
                    self.tracker.shows_scraped(),
                    self.config.target_shows
                );
                return Ok(CrawlOutcome::IterationCapReached);
            }
            iteration += 1;

            self.drain_show_queue().await?;
            if self.target_reached() {
                return Ok(CrawlOutcome::TargetReached);
            }

            self.expand_one_writer().await?;

            if self.frontier.is_empty() {
                tracing::info!("No more shows or writers to process");
                return Ok(if self.target_reached() {
                    CrawlOutcome::TargetReached
                } else {
                    CrawlOutcome::FrontierExhausted
                });
            }
        }
    }

    /// Pops and scrapes queued shows until the queue empties or the
    /// target is met
    ///
    /// A popped show already persisted is discarded without a fetch; this
    /// pop-time check is the only dedup for shows, so duplicate enqueues
    /// are harmless.
    async fn drain_show_queue(&mut self) -> Result<()> {
        while !self.target_reached() {
            let Some(show) = self.frontier.pop_show() else {
                break;
            };
            if self.tracker.is_show_scraped(&show.imdb_id) {
                continue;
            }

            tracing::info!(
                "[{}/{}] Scraping: {}",
                self.tracker.shows_scraped() + 1,
                self.config.target_shows,
                show.title
            );

            match self.scrape_show(&show).await {
                Ok(credit_count) => {
                    tracing::info!("Added {} with {} writer credits", show.title, credit_count);
                    self.delay().await;
                }
                Err(TeleplayError::Fetch(e)) => {
                    tracing::warn!("Failed to scrape show {}: {}", show.imdb_id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Fetches, persists and links one show; returns the credit count
    ///
    /// Only a fully fetched show is marked scraped, so a show that failed
    /// here may be retried if it is ever enqueued again.
    async fn scrape_show(&mut self, show: &ShowRef) -> Result<usize> {
        let detail = self.adapter.fetch_show_detail(&show.imdb_id).await?;
        let show_row_id = self.store.upsert_show(&detail)?;

        self.delay().await;
        let credits = self.adapter.fetch_show_writers(&show.imdb_id).await?;

        for credit in &credits {
            let writer_row_id = self.store.upsert_writer(&credit.imdb_id, &credit.name)?;
            self.store.link_show_writer(
                show_row_id,
                writer_row_id,
                credit.role.as_deref(),
                credit.episode_count,
            )?;
        }

        self.tracker.mark_show_scraped(&show.imdb_id);

        // Writers discovered here only join the queue with a known credit
        // count at or above the threshold; duplicate queue entries are
        // resolved at pop time.
        let credit_count = credits.len();
        for credit in credits {
            if self.tracker.is_writer_processed(&credit.imdb_id) {
                continue;
            }
            if matches!(credit.episode_count, Some(n) if n >= self.config.min_episodes) {
                self.frontier.push_writer(WriterRef {
                    imdb_id: credit.imdb_id,
                    name: credit.name,
                });
            }
        }

        Ok(credit_count)
    }

    /// Pops a single writer and queues every unseen show they wrote for
    ///
    /// The writer is marked processed before the network call, so a
    /// permanently broken id is attempted at most once per run even if it
    /// sits in the queue several times.
    async fn expand_one_writer(&mut self) -> Result<()> {
        let Some(writer) = self.frontier.pop_writer() else {
            return Ok(());
        };
        if self.tracker.is_writer_processed(&writer.imdb_id) {
            tracing::debug!("Skipping already-processed writer {}", writer.imdb_id);
            return Ok(());
        }
        self.tracker.mark_writer_processed(&writer.imdb_id);

        tracing::info!("Checking writer: {}", writer.name);
        self.delay().await;

        let shows = match self.adapter.fetch_writer_filmography(&writer.imdb_id).await {
            Ok(shows) => shows,
            Err(e) => {
                tracing::warn!("Failed to fetch filmography for {}: {}", writer.imdb_id, e);
                return Ok(());
            }
        };

        let total = shows.len();
        let mut queued = 0;
        for show in shows {
            if !self.tracker.is_show_scraped(&show.imdb_id) {
                self.frontier.push_show(show);
                queued += 1;
            }
        }
        tracing::info!("Found {} new shows (of {} total)", queued, total);

        Ok(())
    }

    fn target_reached(&self) -> bool {
        self.tracker.shows_scraped() >= self.config.target_shows as usize
    }

    async fn delay(&self) {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }
    }

    fn summarize(&self, outcome: CrawlOutcome) -> Result<CrawlSummary> {
        let top_overlaps = self.store.overlap_report()?;

        Ok(CrawlSummary {
            outcome,
            shows_total: self.store.count_shows()?,
            writers_total: self.store.count_writers()?,
            writers_with_overlap: top_overlaps.len() as u64,
            top_overlaps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{FetchError, FetchResult, WriterCredit, WriterDetails};
    use crate::storage::SqliteStore;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Adapter that serves canned data and counts every call
    #[derive(Default)]
    struct ScriptedAdapter {
        shows: HashMap<String, ShowRef>,
        credits: HashMap<String, Vec<WriterCredit>>,
        filmographies: HashMap<String, Vec<ShowRef>>,
        detail_calls: RefCell<HashMap<String, u32>>,
        filmography_calls: RefCell<HashMap<String, u32>>,
    }

    impl ScriptedAdapter {
        fn add_show(&mut self, show: ShowRef, credits: Vec<WriterCredit>) {
            self.credits.insert(show.imdb_id.clone(), credits);
            self.shows.insert(show.imdb_id.clone(), show);
        }

        fn add_filmography(&mut self, writer_id: &str, shows: Vec<ShowRef>) {
            self.filmographies.insert(writer_id.to_string(), shows);
        }

        fn detail_calls_for(&self, show_id: &str) -> u32 {
            self.detail_calls
                .borrow()
                .get(show_id)
                .copied()
                .unwrap_or(0)
        }

        fn filmography_calls_for(&self, writer_id: &str) -> u32 {
            self.filmography_calls
                .borrow()
                .get(writer_id)
                .copied()
                .unwrap_or(0)
        }

        fn total_calls(&self) -> u32 {
            self.detail_calls.borrow().values().sum::<u32>()
                + self.filmography_calls.borrow().values().sum::<u32>()
        }
    }

    impl ScrapeAdapter for ScriptedAdapter {
        async fn fetch_show_detail(&self, show_id: &str) -> FetchResult<ShowRef> {
            *self
                .detail_calls
                .borrow_mut()
                .entry(show_id.to_string())
                .or_insert(0) += 1;

            self.shows
                .get(show_id)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: show_id.to_string(),
                    status: 404,
                })
        }

        async fn fetch_show_writers(&self, show_id: &str) -> FetchResult<Vec<WriterCredit>> {
            Ok(self.credits.get(show_id).cloned().unwrap_or_default())
        }

        async fn fetch_writer_filmography(&self, writer_id: &str) -> FetchResult<Vec<ShowRef>> {
            *self
                .filmography_calls
                .borrow_mut()
                .entry(writer_id.to_string())
                .or_insert(0) += 1;

            self.filmographies
                .get(writer_id)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: writer_id.to_string(),
                    status: 404,
                })
        }

        async fn fetch_writer_details(&self, writer_id: &str) -> FetchResult<WriterDetails> {
            Ok(WriterDetails {
                imdb_id: writer_id.to_string(),
                ..Default::default()
            })
        }
    }

    fn show(id: &str, title: &str) -> ShowRef {
        ShowRef {
            imdb_id: id.to_string(),
            title: title.to_string(),
            year_start: Some(2010),
            year_end: None,
        }
    }

    fn credit(id: &str, name: &str, episodes: Option<u32>) -> WriterCredit {
        WriterCredit {
            imdb_id: id.to_string(),
            name: name.to_string(),
            role: Some("written by".to_string()),
            episode_count: episodes,
        }
    }

    fn config(target_shows: u32, max_iterations: u32) -> CrawlConfig {
        CrawlConfig {
            target_shows,
            min_episodes: 3,
            max_iterations,
            request_delay_ms: 0,
        }
    }

    fn temp_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("graph.db")).unwrap();
        (dir, store)
    }

    /// Persists a show with its credits the way a previous run would have
    fn seed_show(store: &SqliteStore, show: &ShowRef, credits: &[WriterCredit]) {
        let show_id = store.upsert_show(show).unwrap();
        for c in credits {
            let writer_id = store.upsert_writer(&c.imdb_id, &c.name).unwrap();
            store
                .link_show_writer(show_id, writer_id, c.role.as_deref(), c.episode_count)
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_target_already_met_performs_zero_fetches() {
        let (_dir, store) = temp_store();
        seed_show(&store, &show("tt0001", "A"), &[credit("nm0001", "W", Some(9))]);
        seed_show(&store, &show("tt0002", "B"), &[]);

        let adapter = ScriptedAdapter::default();
        let cfg = config(2, 500);

        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::TargetReached);
        assert_eq!(summary.shows_total, 2);
        assert_eq!(summary.writers_total, 1);
        assert_eq!(adapter.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_expands_through_prolific_writer_to_new_show() {
        let (_dir, store) = temp_store();
        // One stored show with two writers: one past the episode
        // threshold, one below it.
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[
                credit("nm0001", "Prolific", Some(5)),
                credit("nm0002", "Minor", Some(1)),
            ],
        );

        let mut adapter = ScriptedAdapter::default();
        adapter.add_filmography("nm0001", vec![show("tt0002", "Discovered")]);
        adapter.add_show(
            show("tt0002", "Discovered"),
            vec![credit("nm0001", "Prolific", Some(8))],
        );

        let cfg = config(2, 500);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::TargetReached);
        assert_eq!(summary.shows_total, 2);
        assert_eq!(adapter.detail_calls_for("tt0002"), 1);
        // Below-threshold writer was never expanded.
        assert_eq!(adapter.filmography_calls_for("nm0002"), 0);
        // The new show is linked to its writer.
        assert!(store.count_links().unwrap() >= 3);
        // Prolific now overlaps both shows.
        assert_eq!(summary.writers_with_overlap, 1);
        assert_eq!(summary.top_overlaps[0].writer_name, "Prolific");
        assert_eq!(summary.top_overlaps[0].show_count, 2);
    }

    #[tokio::test]
    async fn test_each_id_fetched_at_most_once() {
        let (_dir, store) = temp_store();
        // Two seeded writers whose filmographies overlap, and a shared
        // discovered writer credited on both new shows: plenty of
        // duplicate enqueues.
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[
                credit("nm0001", "First", Some(5)),
                credit("nm0002", "Second", Some(4)),
            ],
        );

        let shared = credit("nm0003", "Shared", Some(9));
        let mut adapter = ScriptedAdapter::default();
        adapter.add_filmography(
            "nm0001",
            vec![show("tt0002", "Two"), show("tt0003", "Three")],
        );
        adapter.add_filmography("nm0002", vec![show("tt0002", "Two")]);
        adapter.add_filmography("nm0003", vec![]);
        adapter.add_show(show("tt0002", "Two"), vec![shared.clone()]);
        adapter.add_show(show("tt0003", "Three"), vec![shared]);

        let cfg = config(100, 500);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::FrontierExhausted);
        for id in ["tt0002", "tt0003"] {
            assert_eq!(adapter.detail_calls_for(id), 1, "show {} refetched", id);
        }
        for id in ["nm0001", "nm0002", "nm0003"] {
            assert_eq!(
                adapter.filmography_calls_for(id),
                1,
                "writer {} refetched",
                id
            );
        }
        assert_eq!(summary.shows_total, 3);
    }

    #[tokio::test]
    async fn test_second_run_converges_without_new_persists() {
        let (_dir, store) = temp_store();
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[credit("nm0001", "Prolific", Some(5))],
        );

        let mut adapter = ScriptedAdapter::default();
        adapter.add_filmography("nm0001", vec![show("tt0002", "Discovered")]);
        adapter.add_show(
            show("tt0002", "Discovered"),
            vec![credit("nm0001", "Prolific", Some(8))],
        );

        let cfg = config(100, 500);
        let first = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();
        assert_eq!(first.outcome, CrawlOutcome::FrontierExhausted);

        let shows_after_first = store.count_shows().unwrap();
        let writers_after_first = store.count_writers().unwrap();
        let links_after_first = store.count_links().unwrap();

        let second = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(second.outcome, CrawlOutcome::FrontierExhausted);
        assert_eq!(store.count_shows().unwrap(), shows_after_first);
        assert_eq!(store.count_writers().unwrap(), writers_after_first);
        assert_eq!(store.count_links().unwrap(), links_after_first);
        // Every filmography returned only known shows, so no show detail
        // was fetched again.
        assert_eq!(adapter.detail_calls_for("tt0002"), 1);
    }

    #[tokio::test]
    async fn test_exhausted_frontier_reports_accurate_totals() {
        let (_dir, store) = temp_store();
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[credit("nm0001", "Lone", Some(5))],
        );

        let mut adapter = ScriptedAdapter::default();
        // Filmography only returns the show we already have.
        adapter.add_filmography("nm0001", vec![show("tt0001", "Origin")]);

        let cfg = config(50, 500);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::FrontierExhausted);
        assert_eq!(summary.shows_total, 1);
        assert_eq!(summary.writers_total, 1);
        assert_eq!(summary.writers_with_overlap, 0);
    }

    #[tokio::test]
    async fn test_iteration_cap_is_a_distinct_outcome() {
        let (_dir, store) = temp_store();
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[credit("nm0001", "Prolific", Some(5))],
        );

        let mut adapter = ScriptedAdapter::default();
        adapter.add_filmography("nm0001", vec![show("tt0002", "Discovered")]);
        adapter.add_show(show("tt0002", "Discovered"), vec![]);

        // The first iteration only gets as far as the filmography fetch;
        // the discovered show would need a second iteration.
        let cfg = config(100, 1);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::IterationCapReached);
        assert_eq!(summary.shows_total, 1);
        assert_eq!(adapter.detail_calls_for("tt0002"), 0);
    }

    #[tokio::test]
    async fn test_failed_show_fetch_is_not_marked_scraped() {
        let (_dir, store) = temp_store();
        seed_show(
            &store,
            &show("tt0001", "Origin"),
            &[credit("nm0001", "Prolific", Some(5))],
        );

        let mut adapter = ScriptedAdapter::default();
        // tt0404 has a filmography entry but its detail fetch 404s.
        adapter.add_filmography("nm0001", vec![show("tt0404", "Broken")]);

        let cfg = config(100, 500);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::FrontierExhausted);
        assert_eq!(summary.shows_total, 1);
        assert_eq!(adapter.detail_calls_for("tt0404"), 1);
        assert!(!store.existing_show_ids().unwrap().contains("tt0404"));
    }

    #[tokio::test]
    async fn test_failed_filmography_still_marks_writer_processed() {
        let (_dir, store) = temp_store();
        seed_show(
            &store,
            &show("tt0001", "A"),
            &[credit("nm0500", "Broken", Some(5))],
        );

        // No filmography registered for nm0500: the fetch errors.
        let adapter = ScriptedAdapter::default();

        let cfg = config(100, 500);
        let summary = CrawlDriver::new(&store, &adapter, &cfg).run().await.unwrap();

        assert_eq!(summary.outcome, CrawlOutcome::FrontierExhausted);
        assert_eq!(adapter.filmography_calls_for("nm0500"), 1);
    }
}
