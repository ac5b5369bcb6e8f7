//! Markup stripping shared by the extractors

use scraper::{Html, Node};

/// Elements whose text never reaches the reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Collapses every run of whitespace into a single space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the visible text of a parsed document, whitespace-normalized
pub fn document_text(document: &Html) -> String {
    let mut raw = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });

        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }

    normalize_whitespace(&raw)
}

/// Strips all markup from an HTML string
pub fn strip_html(html: &str) -> String {
    document_text(&Html::parse_document(html))
}
