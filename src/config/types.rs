use crate::extract::Profile;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Domain-Miner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlConfig,
}

/// Crawl configuration, immutable for the lifetime of a crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// URL the frontier is seeded with
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Registrable domain the crawl is confined to (subdomains included)
    #[serde(rename = "allowed-domain")]
    pub allowed_domain: String,

    /// Number of concurrent workers
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Maximum number of pages fetched during the crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of URLs waiting in the frontier queue
    #[serde(rename = "queue-capacity", default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Value of the User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Directory receiving the JSON result file and persisted pages
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Append-only crawl log
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: PathBuf,

    /// Active extraction profile
    #[serde(default)]
    pub profile: Profile,

    /// Whether raw page bodies are written to the output directory
    #[serde(rename = "save-html", default)]
    pub save_html: bool,

    /// Explicit robots.txt location; `https://{allowed-domain}/robots.txt` when unset
    #[serde(rename = "robots-url", default)]
    pub robots_url: Option<String>,
}

impl CrawlConfig {
    /// Creates a configuration for the given seed and domain with every
    /// other setting at its default value
    pub fn new(start_url: impl Into<String>, allowed_domain: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            allowed_domain: allowed_domain.into(),
            max_workers: default_max_workers(),
            max_pages: default_max_pages(),
            queue_capacity: default_queue_capacity(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            output_dir: default_output_dir(),
            log_file: default_log_file(),
            profile: Profile::default(),
            save_html: false,
            robots_url: None,
        }
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Path of the JSON result file for the active profile
    pub fn results_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_data.json", self.profile.as_str()))
    }
}

fn default_max_workers() -> usize {
    5
}

fn default_max_pages() -> usize {
    50
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_request_timeout() -> u64 {
    7
}

fn default_user_agent() -> String {
    "DomainMiner/1.0".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/crawler.log")
}
