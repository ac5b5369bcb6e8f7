//! URL handling module for Domain-Miner
//!
//! This module decides which discovered URLs belong to the crawl: a URL is in
//! scope when its host is the allowed domain itself or any subdomain of it.

mod domain;

pub use domain::{extract_domain, is_within_domain};

use url::Url;

/// The set of hosts a crawl is confined to
///
/// # Examples
///
/// ```
/// use domain_miner::url::DomainScope;
///
/// let scope = DomainScope::new("example.com");
/// assert!(scope.contains_str("https://example.com/x"));
/// assert!(scope.contains_str("https://blog.example.com/y"));
/// assert!(!scope.contains_str("https://example.com.evil.net/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    domain: String,
}

impl DomainScope {
    /// Creates a scope rooted at `domain` (compared case-insensitively)
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.trim().trim_end_matches('.').to_lowercase(),
        }
    }

    /// The domain this scope is rooted at
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if the URL's host is the scope domain or one of its subdomains
    pub fn contains(&self, url: &Url) -> bool {
        extract_domain(url)
            .map(|host| is_within_domain(&host, &self.domain))
            .unwrap_or(false)
    }

    /// Same as [`DomainScope::contains`] for an unparsed URL; unparseable input is out of scope
    pub fn contains_str(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| self.contains(&parsed))
            .unwrap_or(false)
    }
}
