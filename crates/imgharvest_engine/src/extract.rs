use std::sync::LazyLock;

use regex::Regex;

/// Image URLs are embedded in HTML-escaped JSON as `murl&quot;:&quot;<url>&quot;`.
static MEDIA_URL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"murl&quot;:&quot;(.*?)&quot;").expect("marker pattern is valid")
});

pub trait LinkExtractor: Send + Sync {
    /// Candidate image URLs in document order. An empty result means the
    /// search has no more pages.
    fn extract(&self, page_body: &str) -> Vec<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerLinkExtractor;

impl LinkExtractor for MarkerLinkExtractor {
    fn extract(&self, page_body: &str) -> Vec<String> {
        MEDIA_URL_MARKER
            .captures_iter(page_body)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
