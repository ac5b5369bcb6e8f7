//! Output module for crawl results and logs
//!
//! This module handles:
//! - The serialized crawl log file fed by every worker
//! - Collecting extracted records and saving them as JSON
//! - Persisting raw page bodies
//! - Crawl statistics and the final summary

mod html;
mod log_sink;
mod results;
mod stats;
mod traits;

pub use html::{page_filename, save_page};
pub use log_sink::{format_line, LogMessage, LogSender, LogSink};
pub use results::ResultAggregator;
pub use stats::{print_summary, CrawlStats, CrawlSummary};
pub use traits::{OutputError, OutputResult};
