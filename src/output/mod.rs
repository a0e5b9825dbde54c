//! Output module for statistics and run reports

mod stats;

pub use stats::{load_statistics, print_statistics, print_summary, NetworkStatistics};
