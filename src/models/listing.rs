use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// ListingInput — What the scraper hands over for one classified ad
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingInput {
    pub title: String,
    pub raw_text: String,
    pub price_str: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl ListingInput {
    /// Build a listing, cutting the description to the bounded length.
    pub fn new(title: &str, raw_text: &str, price_str: &str) -> Self {
        Self {
            title: title.to_string(),
            raw_text: truncate_chars(raw_text, config::MAX_RAW_TEXT_CHARS),
            price_str: price_str.to_string(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
