//! Contacts profile: email addresses and phone numbers

use super::text::strip_html;
use super::{ContactRecord, ExtractError, Extractor, PageRecord, Profile};
use once_cell::sync::Lazy;
use regex::Regex;

/// Country code prepended to bare national numbers
pub const NATIONAL_PREFIX: &str = "+420";

/// Length of a canonical international number including the leading '+'
const INTERNATIONAL_LEN: usize = 13;

/// Number of digits in a bare national number
const NATIONAL_DIGITS: usize = 9;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern is valid")
});

static PHONE_CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s\-]{8,15}").expect("phone pattern is valid"));

/// Normalizes a phone number candidate to `+CCCNNNNNNNNN`
///
/// * 9 bare digits get the national prefix
/// * a leading `00` exit code becomes `+`
/// * numbers already starting with `+` are kept when exactly 13 characters long
///
/// Anything else is rejected.
///
/// # Examples
///
/// ```
/// use domain_miner::extract::normalize_phone;
///
/// assert_eq!(normalize_phone("00420777123456").as_deref(), Some("+420777123456"));
/// assert_eq!(normalize_phone("777 123 456").as_deref(), Some("+420777123456"));
/// assert_eq!(normalize_phone("+420777123456").as_deref(), Some("+420777123456"));
/// assert_eq!(normalize_phone("12345"), None);
/// ```
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if let Some(digits) = compact.strip_prefix('+') {
        let valid = compact.len() == INTERNATIONAL_LEN && digits.chars().all(|c| c.is_ascii_digit());
        return valid.then_some(compact);
    }

    if let Some(rest) = compact.strip_prefix("00") {
        return (compact.len() == INTERNATIONAL_LEN + 1).then(|| format!("+{}", rest));
    }

    (compact.len() == NATIONAL_DIGITS).then(|| format!("{}{}", NATIONAL_PREFIX, compact))
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Finds email addresses in plain text, first occurrence order, no duplicates
pub fn find_emails(text: &str) -> Vec<String> {
    let mut emails = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        push_unique(&mut emails, m.as_str().to_string());
    }
    emails
}

/// Finds and normalizes phone numbers in plain text, no duplicates
pub fn find_phones(text: &str) -> Vec<String> {
    let mut phones = Vec::new();
    for m in PHONE_CANDIDATE_RE.find_iter(text) {
        if let Some(phone) = normalize_phone(m.as_str()) {
            push_unique(&mut phones, phone);
        }
    }
    phones
}

/// Extracts email addresses and phone numbers from the page text
#[derive(Debug, Default, Clone, Copy)]
pub struct ContactsExtractor;

impl ContactsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ContactsExtractor {
    fn profile(&self) -> Profile {
        Profile::Contacts
    }

    fn extract(&self, url: &str, html: &str) -> Result<Option<PageRecord>, ExtractError> {
        if html.trim().is_empty() {
            return Ok(None);
        }

        let text = strip_html(html);

        Ok(Some(PageRecord::Contacts(ContactRecord {
            url: url.to_string(),
            emails: find_emails(&text),
            phones: find_phones(&text),
        })))
    }
}
