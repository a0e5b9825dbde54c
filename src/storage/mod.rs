//! Storage module for the persisted show/writer graph
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent upserts of shows and writers by their stable site ids
//! - Show-writer credit links
//! - Read queries backing crawl seeding, statistics, the JSON API and
//!   the writer-details enrichment job

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{Store, StorageError, StorageResult};

use serde::Serialize;

/// A show row as persisted
#[derive(Debug, Clone, Serialize)]
pub struct ShowRow {
    pub id: i64,
    pub imdb_id: String,
    pub title: String,
    pub year_start: Option<u16>,
    pub year_end: Option<u16>,
    pub scraped_at: String,
}

/// A writer row as persisted
#[derive(Debug, Clone, Serialize)]
pub struct WriterRow {
    pub id: i64,
    pub imdb_id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// One show-writer credit link
#[derive(Debug, Clone, Serialize)]
pub struct LinkRow {
    pub show_id: i64,
    pub writer_id: i64,
    pub role: Option<String>,
    pub episode_count: Option<u32>,
}

/// A writer credited on more than one distinct show
#[derive(Debug, Clone, Serialize)]
pub struct OverlapRecord {
    pub writer_id: i64,
    pub writer_name: String,
    pub writer_imdb_id: String,
    pub show_titles: Vec<String>,
    pub show_ids: Vec<i64>,
    pub show_count: u32,
}
