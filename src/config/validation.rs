use crate::config::types::CrawlConfig;
use crate::url::DomainScope;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates a crawl configuration
///
/// Every check here runs before any worker starts; a failure is fatal for
/// the crawl.
pub fn validate(config: &CrawlConfig) -> ConfigResult<()> {
    validate_limits(config)?;
    validate_user_agent(&config.user_agent)?;
    validate_domain_string(&config.allowed_domain)?;
    validate_start_url(&config.start_url, &config.allowed_domain)?;

    if let Some(robots_url) = &config.robots_url {
        Url::parse(robots_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid robots-url: {}", e)))?;
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    if config.log_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the numeric limits of the crawl
fn validate_limits(config: &CrawlConfig) -> ConfigResult<()> {
    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue-capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1 second, got {}",
            config.request_timeout
        )));
    }

    Ok(())
}

fn validate_user_agent(user_agent: &str) -> ConfigResult<()> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent contains control characters: '{}'",
            user_agent.escape_default()
        )));
    }

    Ok(())
}

/// Validates the seed URL and checks that it lies inside the allowed domain
fn validate_start_url(start_url: &str, allowed_domain: &str) -> ConfigResult<()> {
    let url = Url::parse(start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use http or https",
            start_url
        )));
    }

    if !DomainScope::new(allowed_domain).contains(&url) {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' is outside the allowed domain '{}'",
            start_url, allowed_domain
        )));
    }

    Ok(())
}

/// Validates a domain string
fn validate_domain_string(domain: &str) -> ConfigResult<()> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "allowed-domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
