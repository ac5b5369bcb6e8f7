//! Robots.txt parser implementation
//!
//! Rules apply to every user agent: `User-agent` groups are not interpreted,
//! every `Disallow` line in the file contributes to one global deny list.

use std::time::Duration;
use url::Url;

/// Parsed robots.txt rules
///
/// Loaded once before the workers start and read-only afterwards, so it is
/// shared between workers without locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsPolicy {
    /// Disallowed path prefixes in file order
    disallowed: Vec<String>,
    /// Crawl delay in seconds (0 means no delay)
    crawl_delay: f64,
}

impl RobotsPolicy {
    /// Creates a permissive policy that allows everything without delay
    ///
    /// This is the fallback whenever robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Creates a policy from explicit rules
    pub fn with_rules(disallowed: Vec<String>, crawl_delay: f64) -> Self {
        Self {
            disallowed,
            crawl_delay,
        }
    }

    /// Parses raw robots.txt content
    ///
    /// Directive names are matched case-insensitively. `Disallow:` with an
    /// empty value is ignored. A `Crawl-delay:` value that is not a
    /// non-negative number representable as a `Duration` is ignored and
    /// leaves the delay unchanged.
    pub fn from_content(content: &str) -> Self {
        let mut policy = Self::allow_all();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };

            // Inline comments are not part of the value
            let value = value.split('#').next().unwrap_or("").trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "disallow" => {
                    if !value.is_empty() {
                        policy.disallowed.push(value.to_string());
                    }
                }
                "crawl-delay" => {
                    if let Some(delay) = parse_delay(value) {
                        policy.crawl_delay = delay;
                    }
                }
                _ => {}
            }
        }

        policy
    }

    /// Checks whether a URL path may be fetched
    ///
    /// A path is denied when any rule is `/` or is a prefix of the path.
    pub fn is_allowed(&self, path: &str) -> bool {
        !self
            .disallowed
            .iter()
            .any(|rule| rule == "/" || path.starts_with(rule.as_str()))
    }

    /// Checks the path component of a full URL
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        self.is_allowed(url.path())
    }

    /// The parsed crawl delay in seconds
    pub fn delay_seconds(&self) -> f64 {
        self.crawl_delay
    }

    /// The crawl delay as a `Duration`, `None` when no delay applies
    ///
    /// A delay too large for a `Duration` applies no delay at all.
    pub fn crawl_delay(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.crawl_delay)
            .ok()
            .filter(|delay| !delay.is_zero())
    }

    /// The disallowed path prefixes in file order
    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }
}

fn parse_delay(value: &str) -> Option<f64> {
    let delay = value.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(delay).ok().map(|_| delay)
}
