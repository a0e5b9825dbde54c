//! HTTP client construction and page fetching
//!
//! One client is built per process and reused for every request. Fetches
//! are classified into the [`FetchError`] taxonomy so callers can log and
//! move on without inspecting `reqwest` internals.

use crate::config::UserAgentConfig;
use crate::scrape::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for all page fetches
///
/// The user agent is formatted as `Name/Version (+ContactURL; ContactEmail)`
/// so site operators can identify and reach us.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text
///
/// Non-success statuses and transport failures map to [`FetchError`];
/// redirects are followed by the client.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            })
        }
        Err(e) => {
            return Err(FetchError::Http {
                url: url.to_string(),
                source: e,
            })
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Http {
        url: url.to_string(),
        source: e,
    })
}
