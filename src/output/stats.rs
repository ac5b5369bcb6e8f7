//! Crawl statistics
//!
//! Workers bump lock-free counters while the crawl runs; the coordinator
//! turns them into a [`CrawlSummary`] once every worker has stopped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetch_failures: AtomicUsize,
    extract_failures: AtomicUsize,
    records_kept: AtomicUsize,
    links_dropped: AtomicUsize,
    persist_failures: AtomicUsize,
    page_panics: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extract_failure(&self) {
        self.extract_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_kept(&self) {
        self.records_kept.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_link(&self) {
        self.links_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_panic(&self) {
        self.page_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Builds the final summary from the counters
    pub fn summarize(&self, pages_fetched: usize, page_cap: usize, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            pages_fetched,
            page_cap,
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            extract_failures: self.extract_failures.load(Ordering::Relaxed),
            records_kept: self.records_kept.load(Ordering::Relaxed),
            links_dropped: self.links_dropped.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            page_panics: self.page_panics.load(Ordering::Relaxed),
            finished_early: pages_fetched < page_cap,
            elapsed,
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    /// Pages whose fetch was attempted (failed fetches included)
    pub pages_fetched: usize,

    /// Configured page cap
    pub page_cap: usize,

    pub fetch_failures: usize,
    pub extract_failures: usize,

    /// Records that passed the profile's keep rule
    pub records_kept: usize,

    /// Links lost because the frontier queue was full
    pub links_dropped: usize,

    /// Pages whose raw body could not be written
    pub persist_failures: usize,

    /// Pages whose handling panicked; the worker carried on
    pub page_panics: usize,

    /// True when the frontier drained before the page cap was reached
    pub finished_early: bool,

    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Percentage of attempted fetches that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        let succeeded = self.pages_fetched.saturating_sub(self.fetch_failures);
        (succeeded as f64 / self.pages_fetched as f64) * 100.0
    }

    /// Average pages per second over the whole crawl
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.pages_fetched as f64 / secs
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Pages:");
    println!(
        "  Fetched: {} / {} (cap)",
        summary.pages_fetched, summary.page_cap
    );
    println!("  Fetch failures: {}", summary.fetch_failures);
    println!("  Extraction failures: {}", summary.extract_failures);
    if summary.persist_failures > 0 {
        println!("  Pages not persisted: {}", summary.persist_failures);
    }
    if summary.page_panics > 0 {
        println!("  Pages aborted by a panic: {}", summary.page_panics);
    }
    println!();

    println!("Results:");
    println!("  Records kept: {}", summary.records_kept);
    println!("  Links dropped (queue full): {}", summary.links_dropped);
    println!();

    if summary.finished_early {
        println!("Frontier drained before the page cap was reached.");
    }

    println!(
        "Success Rate: {:.1}% | {:.2} pages/sec over {:.1}s",
        summary.success_rate(),
        summary.pages_per_second(),
        summary.elapsed.as_secs_f64()
    );
}
