use serde::Deserialize;

/// Main configuration structure for Teleplay
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Stop once this many shows are stored
    #[serde(rename = "target-shows", default = "default_target_shows")]
    pub target_shows: u32,

    /// Only follow writers with at least this many episode credits
    #[serde(rename = "min-episodes", default = "default_min_episodes")]
    pub min_episodes: u32,

    /// Safety cap on crawl loop iterations
    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Fixed delay between requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target_shows: default_target_shows(),
            min_episodes: default_min_episodes(),
            max_iterations: default_max_iterations(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

/// Remote site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the content site
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Writer-details enrichment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    /// Truncate bios to roughly this many characters
    #[serde(rename = "bio-max-chars", default = "default_bio_max_chars")]
    pub bio_max_chars: usize,

    /// Log a progress line after this many writers
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Fixed delay between requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            bio_max_chars: default_bio_max_chars(),
            batch_size: default_batch_size(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

/// JSON API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Address the read-only API binds to
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_target_shows() -> u32 {
    200
}

fn default_min_episodes() -> u32 {
    3
}

fn default_max_iterations() -> u32 {
    500
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_base_url() -> String {
    "https://www.imdb.com".to_string()
}

fn default_bio_max_chars() -> usize {
    500
}

fn default_batch_size() -> usize {
    50
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}
