//! Content profile: plain page text

use super::text::strip_html;
use super::{ContentRecord, ExtractError, Extractor, PageRecord, Profile};

/// Maximum number of characters kept per page
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Extracts whitespace-normalized page text
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ContentExtractor {
    fn profile(&self) -> Profile {
        Profile::Content
    }

    fn extract(&self, url: &str, html: &str) -> Result<Option<PageRecord>, ExtractError> {
        if html.trim().is_empty() {
            return Ok(None);
        }

        let text: String = strip_html(html).chars().take(MAX_CONTENT_CHARS).collect();

        Ok(Some(PageRecord::Content(ContentRecord {
            url: url.to_string(),
            text,
        })))
    }
}
