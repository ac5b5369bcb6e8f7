//! Domain-Miner: a polite single-domain data miner
//!
//! This crate crawls one web domain breadth-first with a bounded pool of
//! workers, extracts structured records from every fetched page according to
//! a selectable profile (contacts, SEO metadata or plain content) and writes a
//! deduplicated JSON result set.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Domain-Miner operations
///
/// Only setup-time failures surface through this type. Everything that goes
/// wrong while handling an individual page stays inside the worker that owns
/// the page.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl has already been started for this crawler")]
    AlreadyStarted,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown profile '{0}' (expected one of: contacts, seo, content)")]
    UnknownProfile(String),
}

/// Result type alias for Domain-Miner operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{CrawlProgress, Crawler};
pub use extract::{PageRecord, Profile};
pub use output::CrawlSummary;
pub use url::DomainScope;
