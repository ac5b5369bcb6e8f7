//! Robots.txt handling module
//!
//! robots.txt is fetched once per crawl, before any worker starts. Loading is
//! fail-open: a missing file, a non-200 answer or a network failure all yield
//! an empty policy and crawling proceeds unrestricted.

mod parser;

pub use parser::RobotsPolicy;

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Timeout for the robots.txt request
pub const ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Location of robots.txt for a domain
pub fn robots_url(domain: &str) -> String {
    format!("https://{}/robots.txt", domain)
}

/// Fetches and parses robots.txt for a domain
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `domain` - The domain to fetch robots.txt from
///
/// # Returns
///
/// The parsed policy, or [`RobotsPolicy::allow_all`] on any failure
pub async fn fetch_robots(client: &Client, domain: &str) -> RobotsPolicy {
    fetch_robots_from(client, &robots_url(domain), ROBOTS_TIMEOUT).await
}

/// Fetches and parses robots.txt from an explicit location
pub async fn fetch_robots_from(client: &Client, url: &str, timeout: Duration) -> RobotsPolicy {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt unavailable at {}: {}", url, e);
            return RobotsPolicy::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} answered {}, crawling unrestricted",
            url,
            response.status()
        );
        return RobotsPolicy::allow_all();
    }

    match response.text().await {
        Ok(body) => RobotsPolicy::from_content(&body),
        Err(e) => {
            tracing::debug!("Failed to read robots.txt body from {}: {}", url, e);
            RobotsPolicy::allow_all()
        }
    }
}
