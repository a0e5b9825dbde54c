//! Configuration loading, parsing, and validation
//!
//! Configuration is a TOML file with sections for crawl behavior, the
//! remote site, user-agent identification, output, enrichment, and the
//! JSON API. Only `[user-agent]` and `[output]` are required; everything
//! else has sensible defaults.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    ApiConfig, Config, CrawlConfig, EnrichConfig, OutputConfig, SourceConfig, UserAgentConfig,
};
pub use validation::validate;
