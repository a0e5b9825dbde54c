//! Teleplay: a TV-show / writer network mapper
//!
//! This crate crawls a public content site to build a bipartite graph of
//! television shows and the writers credited on them, persisting the graph
//! in SQLite and expanding it by following writers out to shows they have
//! written that are not yet known.

pub mod api;
pub mod config;
pub mod crawler;
pub mod enrich;
pub mod output;
pub mod scrape;
pub mod storage;

use thiserror::Error;

/// Main error type for Teleplay operations
#[derive(Debug, Error)]
pub enum TeleplayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] scrape::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Teleplay operations
pub type Result<T> = std::result::Result<T, TeleplayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{expand_network, CrawlOutcome, CrawlSummary};
pub use scrape::{FetchError, ImdbScraper, ScrapeAdapter, ShowRef, WriterCredit};
pub use storage::{SqliteStore, Store};
