use url::Url;

/// Extracts the lowercase host from a URL
///
/// The port is not part of the host, so `https://example.com:8080/` yields
/// `example.com`. URLs without a host (such as `mailto:`) yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use domain_miner::url::extract_domain;
///
/// let url = Url::parse("https://Sub.EXAMPLE.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `host` equals `domain` or ends with `"." + domain`
///
/// Both arguments are expected to be lowercase already.
pub fn is_within_domain(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    host == domain
        || host
            .strip_suffix(domain)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}
