//! Frontier queues for pending fetch work
//!
//! Two independent FIFO queues with no priority beyond arrival order:
//! shows awaiting a detail fetch and writers awaiting a filmography
//! fetch. The queues accept duplicates; the driver deduplicates work at
//! pop time against its own sets, never at enqueue time.

use crate::scrape::{ShowRef, WriterRef};
use std::collections::VecDeque;

/// The pending-work queues for one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    show_queue: VecDeque<ShowRef>,
    writer_queue: VecDeque<WriterRef>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a show for a detail fetch
    pub fn push_show(&mut self, show: ShowRef) {
        self.show_queue.push_back(show);
    }

    /// Takes the oldest queued show, if any
    pub fn pop_show(&mut self) -> Option<ShowRef> {
        self.show_queue.pop_front()
    }

    /// Queues a writer for a filmography fetch
    pub fn push_writer(&mut self, writer: WriterRef) {
        self.writer_queue.push_back(writer);
    }

    /// Takes the oldest queued writer, if any
    pub fn pop_writer(&mut self) -> Option<WriterRef> {
        self.writer_queue.pop_front()
    }

    /// Number of queued shows
    pub fn show_count(&self) -> usize {
        self.show_queue.len()
    }

    /// Number of queued writers
    pub fn writer_count(&self) -> usize {
        self.writer_queue.len()
    }

    /// True when both queues are empty
    pub fn is_empty(&self) -> bool {
        self.show_queue.is_empty() && self.writer_queue.is_empty()
    }
}
