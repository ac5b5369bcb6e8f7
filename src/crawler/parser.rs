//! Link discovery
//!
//! Collects the targets of every `<a href>` on a page, resolved against the
//! page URL. Scope and robots filtering happen in the worker.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts all followable links from an HTML page
///
/// Links are returned as absolute URLs without fragments, in document order,
/// with duplicates removed.
///
/// **Excluded:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to an http(s) URL
///
/// # Example
///
/// ```
/// use domain_miner::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><a href="mailto:a@b.cz">Mail</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links: Vec<Url> = Vec::new();
    let mut seen: HashSet<Url> = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(link) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/dir/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(html, &base_url())
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_extract_absolute_link() {
        let found = links(r#"<a href="https://other.com/page">Link</a>"#);
        assert_eq!(found, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_links() {
        let found = links(r#"<a href="/root">A</a><a href="sibling">B</a>"#);
        assert_eq!(
            found,
            vec!["https://example.com/root", "https://example.com/dir/sibling"]
        );
    }

    #[test]
    fn test_parent_path_and_fragment_stripped() {
        let found = links(r#"<a href="../x?y=1#frag">Up</a>"#);
        assert_eq!(found, vec!["https://example.com/x?y=1"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <a href="javascript:void(0)">JS</a>
            <a href="JavaScript:alert(1)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
            <a href="ftp://example.com/file">FTP</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<a href="#section">Jump</a><a href="">Empty</a>"##;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_duplicates_collapsed_in_order() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b#top">B again</a>
        "#;
        assert_eq!(
            links(html),
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let html = r#"
            <a href="/valid">Valid</a>
            <a href="javascript:alert('no')">Invalid</a>
            <a href="mailto:test@example.com">Invalid</a>
            <a href="/another-valid">Valid</a>
        "#;
        assert_eq!(links(html).len(), 2);
    }
}
