//! SEO profile: title, meta description, meta keywords and headings

use super::text::normalize_whitespace;
use super::{selector, ExtractError, Extractor, PageRecord, Profile, SeoRecord};
use scraper::{ElementRef, Html};

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Extracts SEO metadata from the document head and headings
#[derive(Debug, Default, Clone, Copy)]
pub struct SeoExtractor;

impl SeoExtractor {
    pub fn new() -> Self {
        Self
    }

    fn meta_content(document: &Html, name: &str) -> Result<String, ExtractError> {
        let meta = selector("meta[name][content]")?;

        Ok(document
            .select(&meta)
            .find(|el| {
                el.value()
                    .attr("name")
                    .map(|n| n.trim().eq_ignore_ascii_case(name))
                    .unwrap_or(false)
            })
            .and_then(|el| el.value().attr("content"))
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }
}

impl Extractor for SeoExtractor {
    fn profile(&self) -> Profile {
        Profile::Seo
    }

    fn extract(&self, url: &str, html: &str) -> Result<Option<PageRecord>, ExtractError> {
        if html.trim().is_empty() {
            return Ok(None);
        }

        let document = Html::parse_document(html);

        let title_selector = selector("title")?;
        let title = document
            .select(&title_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let meta_description = Self::meta_content(&document, "description")?;

        let meta_keywords = Self::meta_content(&document, "keywords")?
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        let heading_selector = selector("h1, h2, h3, h4, h5, h6")?;
        let headings = document
            .select(&heading_selector)
            .map(element_text)
            .filter(|h| !h.is_empty())
            .collect();

        Ok(Some(PageRecord::Seo(SeoRecord {
            url: url.to_string(),
            title,
            meta_description,
            meta_keywords,
            headings,
        })))
    }
}
