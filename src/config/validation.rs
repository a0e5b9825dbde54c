use crate::config::types::{
    ApiConfig, Config, CrawlConfig, EnrichConfig, OutputConfig, SourceConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_enrich_config(&config.enrich)?;
    validate_api_config(&config.api)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.target_shows < 1 {
        return Err(ConfigError::Validation(format!(
            "target_shows must be >= 1, got {}",
            config.target_shows
        )));
    }

    if config.max_iterations < 1 {
        return Err(ConfigError::Validation(format!(
            "max_iterations must be >= 1, got {}",
            config.max_iterations
        )));
    }

    if config.request_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be >= 100ms, got {}ms",
            config.request_delay_ms
        )));
    }

    Ok(())
}

/// Validates the remote site configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url must use HTTP or HTTPS, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates user agent configuration
///
/// The four fields end up verbatim in the User-Agent header, so they must
/// form a string a site operator can read and act on.
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    let name = &config.crawler_name;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "crawler_name must be non-empty, alphanumerics and hyphens only, got '{}'",
            name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates enrichment configuration
fn validate_enrich_config(config: &EnrichConfig) -> Result<(), ConfigError> {
    if config.bio_max_chars < 1 {
        return Err(ConfigError::Validation(
            "bio_max_chars must be >= 1".to_string(),
        ));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(
            "batch_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    config
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|_| {
            ConfigError::Validation(format!(
                "bind_address must be a host:port pair, got '{}'",
                config.bind_address
            ))
        })
        .map(|_| ())
}

/// Shallow email check: one @, text either side, dotted domain
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !well_formed {
        return Err(ConfigError::Validation(format!(
            "contact_email is not a usable address: '{}'",
            email
        )));
    }

    Ok(())
}
