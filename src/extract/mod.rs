//! Page extraction profiles
//!
//! A [`Profile`] is chosen once from configuration and turned into a single
//! [`Extractor`] that every worker shares. Each extractor turns a page body
//! into a [`PageRecord`]; the record's keep rule then decides whether it
//! enters the result set.

mod contacts;
mod content;
mod seo;
mod text;

pub use contacts::{normalize_phone, ContactsExtractor, NATIONAL_PREFIX};
pub use content::{ContentExtractor, MAX_CONTENT_CHARS};
pub use seo::SeoExtractor;
pub use text::{normalize_whitespace, strip_html};

use crate::ConfigError;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while extracting data from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    #[error("Malformed page: {0}")]
    Malformed(String),
}

/// Extraction strategy selected for a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Profile {
    /// Email addresses and phone numbers
    #[default]
    Contacts,
    /// Title, meta description/keywords and headings
    Seo,
    /// Plain page text
    Content,
}

impl Profile {
    /// All available profiles
    pub const ALL: [Profile; 3] = [Profile::Contacts, Profile::Seo, Profile::Content];

    /// The profile's configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Seo => "seo",
            Self::Content => "content",
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            Self::Contacts => "email addresses and phone numbers",
            Self::Seo => "title, meta description, meta keywords and headings",
            Self::Content => "plain page text (first 2000 characters)",
        }
    }

    /// Builds the extractor implementing this profile
    pub fn extractor(&self) -> Arc<dyn Extractor> {
        match self {
            Self::Contacts => Arc::new(ContactsExtractor::new()),
            Self::Seo => Arc::new(SeoExtractor::new()),
            Self::Content => Arc::new(ContentExtractor::new()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contacts" => Ok(Self::Contacts),
            "seo" => Ok(Self::Seo),
            "content" => Ok(Self::Content),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

impl TryFrom<String> for Profile {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Record produced by the contacts profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub url: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactRecord {
    /// Kept when at least one email or phone number was found
    pub fn should_keep(&self) -> bool {
        !self.emails.is_empty() || !self.phones.is_empty()
    }
}

/// Record produced by the SEO profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRecord {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: Vec<String>,
    pub headings: Vec<String>,
}

impl SeoRecord {
    /// Kept when the page has a title or a meta description
    pub fn should_keep(&self) -> bool {
        !self.title.trim().is_empty() || !self.meta_description.trim().is_empty()
    }
}

/// Record produced by the content profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub url: String,
    pub text: String,
}

/// Minimum number of characters for a content record to be kept
pub const MIN_CONTENT_CHARS: usize = 21;

impl ContentRecord {
    /// Kept when the text is longer than 20 characters
    pub fn should_keep(&self) -> bool {
        self.text.trim().chars().count() >= MIN_CONTENT_CHARS
    }
}

/// One extracted page, shaped by the profile that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRecord {
    Contacts(ContactRecord),
    Seo(SeoRecord),
    Content(ContentRecord),
}

impl PageRecord {
    /// The URL of the page the record was extracted from
    pub fn url(&self) -> &str {
        match self {
            Self::Contacts(r) => &r.url,
            Self::Seo(r) => &r.url,
            Self::Content(r) => &r.url,
        }
    }

    /// Applies the keep rule of the record's profile
    pub fn should_keep(&self) -> bool {
        match self {
            Self::Contacts(r) => r.should_keep(),
            Self::Seo(r) => r.should_keep(),
            Self::Content(r) => r.should_keep(),
        }
    }
}

/// A page extraction strategy
///
/// Implementations are stateless and shared by all workers.
pub trait Extractor: Send + Sync {
    /// The profile this extractor implements
    fn profile(&self) -> Profile;

    /// Extracts a record from a page body
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - A record; the caller applies the keep rule
    /// * `Ok(None)` - Nothing of interest (empty body)
    /// * `Err(ExtractError)` - Extraction failed for this page
    fn extract(&self, url: &str, html: &str) -> Result<Option<PageRecord>, ExtractError>;
}

/// Parses a CSS selector, mapping failures to [`ExtractError`]
pub(crate) fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css,
        message: format!("{:?}", e),
    })
}
