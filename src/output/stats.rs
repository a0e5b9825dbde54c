//! Statistics over the stored graph and stdout report rendering

use crate::crawler::{CrawlOutcome, CrawlSummary};
use crate::storage::Store;
use crate::TeleplayError;

/// How many overlap entries a report prints
const TOP_OVERLAPS_SHOWN: usize = 15;

/// How many show titles are listed per overlapping writer
const TITLES_SHOWN: usize = 5;

/// Stored-graph totals
#[derive(Debug, Clone)]
pub struct NetworkStatistics {
    /// Total number of shows stored
    pub shows_total: u64,

    /// Total number of writers stored
    pub writers_total: u64,

    /// Total number of show-writer credit links
    pub links_total: u64,

    /// Writers credited on more than one show
    pub writers_with_overlap: u64,
}

/// Loads statistics from storage
pub fn load_statistics(store: &dyn Store) -> Result<NetworkStatistics, TeleplayError> {
    let shows_total = store.count_shows()?;
    let writers_total = store.count_writers()?;
    let links_total = store.count_links()?;
    let writers_with_overlap = store.overlap_report()?.len() as u64;

    Ok(NetworkStatistics {
        shows_total,
        writers_total,
        links_total,
        writers_with_overlap,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &NetworkStatistics) {
    println!("=== Network Statistics ===\n");

    println!("Overview:");
    println!("  Shows: {}", stats.shows_total);
    println!("  Writers: {}", stats.writers_total);
    println!("  Credit links: {}", stats.links_total);
    println!();

    let overlap_share = if stats.writers_total > 0 {
        (stats.writers_with_overlap as f64 / stats.writers_total as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Writers on multiple shows: {} ({:.1}%)",
        stats.writers_with_overlap, overlap_share
    );
}

/// Prints a crawl run's summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Expansion Complete ===\n");

    match summary.outcome {
        CrawlOutcome::TargetReached => println!("Outcome: target reached"),
        CrawlOutcome::FrontierExhausted => {
            println!("Outcome: frontier exhausted before target")
        }
        CrawlOutcome::IterationCapReached => {
            println!("Outcome: iteration cap reached, result incomplete")
        }
    }
    println!();

    println!("Total shows: {}", summary.shows_total);
    println!("Total writers: {}", summary.writers_total);
    println!("Writers with overlap: {}", summary.writers_with_overlap);

    if summary.top_overlaps.is_empty() {
        return;
    }

    println!(
        "\nTop {} writers by show count:",
        summary.top_overlaps.len().min(TOP_OVERLAPS_SHOWN)
    );
    for overlap in summary.top_overlaps.iter().take(TOP_OVERLAPS_SHOWN) {
        println!("  {}: {} shows", overlap.writer_name, overlap.show_count);

        let shown: Vec<&str> = overlap
            .show_titles
            .iter()
            .take(TITLES_SHOWN)
            .map(String::as_str)
            .collect();
        let more = overlap.show_titles.len().saturating_sub(TITLES_SHOWN);
        if more > 0 {
            println!("    {}... +{} more", shown.join(", "), more);
        } else {
            println!("    {}", shown.join(", "));
        }
    }
}
