//! Raw page persistence

use crate::output::{OutputError, OutputResult};
use std::path::{Path, PathBuf};
use url::Url;

/// Maximum length of the path-derived part of a file name
const MAX_PATH_CHARS: usize = 50;

/// Builds the file name for a persisted page
///
/// The name is `{index:04}_{path}.html` where `path` is the URL path without
/// surrounding slashes (`index` for the root), every character other than an
/// ASCII letter, digit, `-` or `_` replaced by `_`, truncated to 50 characters.
///
/// # Examples
///
/// ```
/// use domain_miner::output::page_filename;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/blog/post-1/").unwrap();
/// assert_eq!(page_filename(7, &url), "0007_blog_post-1.html");
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert_eq!(page_filename(1, &root), "0001_index.html");
/// ```
pub fn page_filename(index: usize, url: &Url) -> String {
    let trimmed = url.path().trim_matches('/');
    let path = if trimmed.is_empty() { "index" } else { trimmed };

    let sanitized: String = path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_PATH_CHARS)
        .collect();

    format!("{:04}_{}.html", index, sanitized)
}

/// Writes a fetched page to `dir`, prefixed with a comment naming its URL
pub async fn save_page(
    dir: &Path,
    index: usize,
    url: &Url,
    body: &str,
) -> OutputResult<PathBuf> {
    let path = dir.join(page_filename(index, url));
    let content = format!("<!-- URL: {} -->\n{}", url, body);

    tokio::fs::write(&path, content)
        .await
        .map_err(|e| OutputError::write(&path, e))?;

    Ok(path)
}
