//! Storage trait and error types

use crate::scrape::{ShowRef, WriterRef};
use crate::storage::{LinkRow, OverlapRecord, ShowRow, WriterRow};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every method is self-contained: implementations open whatever resources
/// they need per call and release them before returning, so callers get no
/// cross-call consistency guarantee. Duplicate writes are absorbed by the
/// natural-key uniqueness constraints, not by in-process locking.
pub trait Store {
    // ===== Writes =====

    /// Inserts a show or returns the existing row id for its `imdb_id`
    fn upsert_show(&self, show: &ShowRef) -> StorageResult<i64>;

    /// Inserts a writer or returns the existing row id for its `imdb_id`
    fn upsert_writer(&self, imdb_id: &str, name: &str) -> StorageResult<i64>;

    /// Links a writer to a show with optional role and episode count
    ///
    /// Idempotent on `(show, writer, role)`; a duplicate link is silently
    /// ignored.
    fn link_show_writer(
        &self,
        show_id: i64,
        writer_id: i64,
        role: Option<&str>,
        episode_count: Option<u32>,
    ) -> StorageResult<()>;

    /// Updates a writer's image URL and/or bio
    ///
    /// Returns false when no writer with that `imdb_id` exists.
    fn update_writer_details(
        &self,
        imdb_id: &str,
        image_url: Option<&str>,
        bio: Option<&str>,
    ) -> StorageResult<bool>;

    // ===== Crawl seeding =====

    /// Site ids of every show already persisted
    fn existing_show_ids(&self) -> StorageResult<HashSet<String>>;

    /// Writers linked to at least one show whose maximum episode count
    /// meets the threshold or is unknown, most-credited first
    fn eligible_seed_writers(&self, min_episodes: u32) -> StorageResult<Vec<WriterRef>>;

    // ===== Reads =====

    /// All shows, ordered by title
    fn all_shows(&self) -> StorageResult<Vec<ShowRow>>;

    /// All writers, ordered by name
    fn all_writers(&self) -> StorageResult<Vec<WriterRow>>;

    /// All show-writer links
    fn all_links(&self) -> StorageResult<Vec<LinkRow>>;

    /// Writers credited on more than one distinct show, ordered by show
    /// count descending then name ascending
    fn overlap_report(&self) -> StorageResult<Vec<OverlapRecord>>;

    /// Writers still missing an image URL or bio, ordered by name
    fn writers_without_details(&self) -> StorageResult<Vec<WriterRef>>;

    /// Total show count
    fn count_shows(&self) -> StorageResult<u64>;

    /// Total writer count
    fn count_writers(&self) -> StorageResult<u64>;

    /// Total link count
    fn count_links(&self) -> StorageResult<u64>;
}
