//! Writer-details enrichment job
//!
//! A standalone batch pass over writers that are still missing a portrait
//! or bio: fetch each writer's page, truncate the bio to a readable
//! length, and update the row. Strictly sequential with a fixed delay
//! between requests, and entirely independent of the crawl loop.

use crate::config::EnrichConfig;
use crate::scrape::ScrapeAdapter;
use crate::storage::Store;
use crate::Result;
use std::time::Duration;

/// Counters reported at the end of an enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Writers examined
    pub processed: u64,

    /// Writers whose row was updated with at least one field
    pub updated: u64,

    /// Portrait URLs found
    pub images_found: u64,

    /// Bios found
    pub bios_found: u64,
}

/// Fetches and stores details for every writer still missing them
///
/// Fetch failures are logged and skipped; the pass always completes and
/// returns its counters.
pub async fn enrich_writer_details<S: Store, A: ScrapeAdapter>(
    store: &S,
    adapter: &A,
    config: &EnrichConfig,
) -> Result<EnrichReport> {
    let writers = store.writers_without_details()?;
    let total = writers.len();
    tracing::info!("Found {} writers without complete details", total);

    let mut report = EnrichReport::default();

    for (i, writer) in writers.iter().enumerate() {
        tracing::info!("[{}/{}] {}", i + 1, total, writer.name);
        report.processed += 1;

        let details = match adapter.fetch_writer_details(&writer.imdb_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!("Failed to fetch details for {}: {}", writer.imdb_id, e);
                continue;
            }
        };

        let bio = details
            .bio
            .as_deref()
            .map(|text| truncate_bio(text, config.bio_max_chars));

        if details.image_url.is_some() || bio.is_some() {
            store.update_writer_details(
                &writer.imdb_id,
                details.image_url.as_deref(),
                bio.as_deref(),
            )?;
            report.updated += 1;

            if details.image_url.is_some() {
                report.images_found += 1;
            }
            if bio.is_some() {
                report.bios_found += 1;
            }
        } else {
            tracing::debug!("No details found for {}", writer.imdb_id);
        }

        if config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.request_delay_ms)).await;
        }

        if (i + 1) % config.batch_size == 0 {
            tracing::info!(
                "Progress: {}/{} writers, {} images, {} bios",
                i + 1,
                total,
                report.images_found,
                report.bios_found
            );
        }
    }

    tracing::info!(
        "Enrichment complete: {} processed, {} updated, {} images, {} bios",
        report.processed,
        report.updated,
        report.images_found,
        report.bios_found
    );

    Ok(report)
}

/// Truncates a bio to roughly `max_length` characters
///
/// Prefers cutting at a sentence boundary in the second half of the
/// window, then at a word boundary, and only then mid-text. Text already
/// within the limit is returned unchanged.
pub fn truncate_bio(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        return text.to_string();
    }

    let truncated = safe_prefix(text, max_length);

    for punct in [". ", "! ", "? "] {
        if let Some(idx) = truncated.rfind(punct) {
            if idx > max_length / 2 {
                return truncated[..idx + 1].trim().to_string();
            }
        }
    }

    if let Some(idx) = truncated.rfind(' ') {
        if idx > max_length / 2 {
            return format!("{}...", truncated[..idx].trim());
        }
    }

    format!("{}...", truncated.trim())
}

/// Longest prefix of at most `max_len` bytes that ends on a char boundary
fn safe_prefix(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
