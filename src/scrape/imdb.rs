//! Production scrape adapter backed by the remote site

use crate::config::{SourceConfig, UserAgentConfig};
use crate::scrape::client::{build_http_client, fetch_page};
use crate::scrape::show::{parse_show_detail, parse_show_writers};
use crate::scrape::writer::{parse_writer_details, parse_writer_filmography};
use crate::scrape::{FetchError, FetchResult, ScrapeAdapter, ShowRef, WriterCredit, WriterDetails};
use reqwest::Client;

/// Scrape adapter fetching live pages from the configured site
pub struct ImdbScraper {
    client: Client,
    base_url: String,
}

impl ImdbScraper {
    /// Creates an adapter from the source and user-agent configuration
    pub fn new(source: &SourceConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent)?;
        Ok(Self::with_client(client, &source.base_url))
    }

    /// Creates an adapter with a prebuilt client, mainly for tests
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn title_url(&self, show_id: &str) -> String {
        format!("{}/title/{}/", self.base_url, show_id)
    }

    fn credits_url(&self, show_id: &str) -> String {
        format!("{}/title/{}/fullcredits/", self.base_url, show_id)
    }

    fn name_url(&self, writer_id: &str) -> String {
        format!("{}/name/{}/", self.base_url, writer_id)
    }
}

impl ScrapeAdapter for ImdbScraper {
    async fn fetch_show_detail(&self, show_id: &str) -> FetchResult<ShowRef> {
        let url = self.title_url(show_id);
        let html = fetch_page(&self.client, &url).await?;

        parse_show_detail(&html, show_id).ok_or_else(|| FetchError::Parse {
            url,
            message: "no usable title data on page".to_string(),
        })
    }

    async fn fetch_show_writers(&self, show_id: &str) -> FetchResult<Vec<WriterCredit>> {
        let url = self.credits_url(show_id);
        let html = fetch_page(&self.client, &url).await?;

        Ok(parse_show_writers(&html))
    }

    async fn fetch_writer_filmography(&self, writer_id: &str) -> FetchResult<Vec<ShowRef>> {
        let url = self.name_url(writer_id);
        let html = fetch_page(&self.client, &url).await?;

        Ok(parse_writer_filmography(&html))
    }

    async fn fetch_writer_details(&self, writer_id: &str) -> FetchResult<WriterDetails> {
        let url = self.name_url(writer_id);
        let html = fetch_page(&self.client, &url).await?;

        Ok(parse_writer_details(&html, writer_id))
    }
}
