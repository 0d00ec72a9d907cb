//! Feed document parsing.
//!
//! RSS 2.0 goes through the `rss` crate, which keeps `<enclosure>`,
//! `media:content` and the item description apart. Anything it rejects
//! (Atom, RSS 1.0, JSON Feed) is handed to `feed-rs`.

use feed_rs::parser;
use rss::extension::ExtensionMap;
use tracing::trace;

use crate::error::{InventoryError, Result};
use crate::news::types::{ParsedFeed, RawFeedItem};

/// Parse feed bytes into a ParsedFeed.
///
/// Snippets are stripped of markup and cut to `max_snippet_length` characters.
pub fn parse_feed(bytes: &[u8], max_snippet_length: usize) -> Result<ParsedFeed> {
    match rss::Channel::read_from(bytes) {
        Ok(channel) => Ok(from_rss_channel(&channel, max_snippet_length)),
        Err(rss_err) => {
            trace!("Not an RSS 2.0 document ({}), trying feed-rs", rss_err);
            from_feed_rs(bytes, max_snippet_length)
        }
    }
}

fn from_rss_channel(channel: &rss::Channel, max_snippet_length: usize) -> ParsedFeed {
    let items = channel
        .items()
        .iter()
        .map(|item| {
            let content = item
                .description()
                .or_else(|| item.content())
                .map(str::to_string);
            let content_snippet = snippet(content.as_deref(), max_snippet_length);

            RawFeedItem {
                title: non_empty(item.title()),
                link: non_empty(item.link()),
                pub_date: non_empty(item.pub_date()),
                content_snippet,
                content,
                enclosure_url: item.enclosure().and_then(|e| non_empty(Some(e.url()))),
                media_content_url: media_content_url(item.extensions()),
            }
        })
        .collect();

    ParsedFeed {
        title: non_empty(Some(channel.title())),
        items,
    }
}

/// URL attribute of the first `media:content` extension element.
fn media_content_url(extensions: &ExtensionMap) -> Option<String> {
    extensions
        .get("media")?
        .get("content")?
        .iter()
        .find_map(|ext| ext.attrs().get("url").cloned())
        .filter(|url| !url.trim().is_empty())
}

fn from_feed_rs(bytes: &[u8], max_snippet_length: usize) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| InventoryError::FeedFetch(format!("failed to parse feed: {}", e)))?;

    let title = feed.title.map(|t| t.content).filter(|t| !t.trim().is_empty());

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .iter()
                .find(|l| l.rel.as_deref() != Some("enclosure"))
                .map(|l| l.href.clone());
            let enclosure_url = entry
                .links
                .iter()
                .find(|l| l.rel.as_deref() == Some("enclosure"))
                .map(|l| l.href.clone());
            let media_content_url = entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|c| c.url.as_ref().map(|u| u.to_string()));
            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content));
            let content_snippet = snippet(content.as_deref(), max_snippet_length);

            RawFeedItem {
                title: entry.title.map(|t| t.content).filter(|t| !t.trim().is_empty()),
                link,
                // feed-rs keeps only the parsed instant, so Atom dates are re-emitted in UTC
                pub_date: entry.published.or(entry.updated).map(|dt| dt.to_rfc3339()),
                content_snippet,
                content,
                enclosure_url,
                media_content_url,
            }
        })
        .collect();

    Ok(ParsedFeed { title, items })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn snippet(html: Option<&str>, max_length: usize) -> Option<String> {
    html.map(strip_html)
        .filter(|text| !text.is_empty())
        .map(|text| truncate_chars(&text, max_length))
}

/// Strip HTML tags from text, decode entities and collapse whitespace.
///
/// Tags are removed before entities are decoded, so escaped markup such as
/// `&lt;b&gt;` survives as text.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    html_escape::decode_html_entities(&text)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

fn truncate_chars(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        text.chars().take(max_length).collect()
    }
}
