//! Representative image lookup for feed items.

use std::sync::OnceLock;

use regex::Regex;

use crate::news::types::RawFeedItem;

fn img_src_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("img src pattern is valid")
    })
}

/// Find an image URL for a feed item.
///
/// Sources are tried in order and the first hit wins: the enclosure URL,
/// the `media:content` URL, then the `src` of the first `<img>` tag in the
/// item's HTML content.
pub fn extract_image(item: &RawFeedItem) -> Option<String> {
    non_empty(item.enclosure_url.as_deref())
        .or_else(|| non_empty(item.media_content_url.as_deref()))
        .or_else(|| item.content.as_deref().and_then(first_img_src))
}

/// Return the `src` attribute of the first `<img>` tag in an HTML fragment.
pub fn first_img_src(html: &str) -> Option<String> {
    img_src_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
