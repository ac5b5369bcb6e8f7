//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without retry
//! - Link discovery
//! - The shared frontier with dedup and the page cap
//! - The worker pool and overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod worker;

pub use coordinator::{CrawlProgress, Crawler};
pub use fetcher::{build_http_client, FetchError, PageFetcher};
pub use frontier::{Frontier, Offer};
pub use parser::extract_links;

use crate::config::CrawlConfig;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl and saves its results
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Build the crawler (validating the configuration)
/// 2. Run the worker pool until the frontier drains or the page cap is hit
/// 3. Write the kept records to the result file
///
/// # Returns
///
/// * `Ok((CrawlSummary, PathBuf))` - The crawl summary and the result file path
/// * `Err(CrawlError)` - Setup failed or the results could not be written
pub async fn crawl(config: CrawlConfig) -> Result<(CrawlSummary, std::path::PathBuf), CrawlError> {
    let crawler = Crawler::new(config)?;
    let summary = crawler.run().await?;
    let path = crawler.save_results()?;
    Ok((summary, path))
}
