//! News aggregation types for AI Inventory.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of newest articles kept per aggregation pass.
pub const DEFAULT_TOP_N: usize = 20;

/// Default summary used when a feed item carries none.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// A feed parsed into its raw items.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Feed title, if the feed declares one.
    pub title: Option<String>,
    /// Items in document order.
    pub items: Vec<RawFeedItem>,
}

/// One entry of a feed as the parser saw it.
///
/// Lives only for the duration of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedItem {
    /// Item title.
    pub title: Option<String>,
    /// Link to the original article.
    pub link: Option<String>,
    /// Publication date exactly as the feed wrote it.
    pub pub_date: Option<String>,
    /// Plain-text snippet derived from the item's HTML.
    pub content_snippet: Option<String>,
    /// HTML body (`content:encoded`, description or Atom content).
    pub content: Option<String>,
    /// URL of an `<enclosure>` element.
    pub enclosure_url: Option<String>,
    /// URL attribute of a `media:content` element.
    pub media_content_url: Option<String>,
}

impl RawFeedItem {
    /// Create an item with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the publication date string.
    pub fn with_pub_date(mut self, pub_date: impl Into<String>) -> Self {
        self.pub_date = Some(pub_date.into());
        self
    }

    /// Set the plain-text snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.content_snippet = Some(snippet.into());
        self
    }

    /// Set the HTML content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the enclosure URL.
    pub fn with_enclosure(mut self, url: impl Into<String>) -> Self {
        self.enclosure_url = Some(url.into());
        self
    }

    /// Set the media-content URL.
    pub fn with_media_content(mut self, url: impl Into<String>) -> Self {
        self.media_content_url = Some(url.into());
        self
    }
}

/// A normalized article before it has been ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub pub_date: String,
    pub image: Option<String>,
}

impl ArticleDraft {
    /// Publication instant used for ordering. `None` sorts as oldest.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_pub_date(&self.pub_date)
    }

    /// Attach the rank-derived id.
    pub fn into_summary(self, id: i64) -> ArticleSummary {
        ArticleSummary {
            id,
            title: self.title,
            summary: self.summary,
            link: self.link,
            source: self.source,
            pub_date: self.pub_date,
            image: self.image,
        }
    }
}

/// An aggregated article as served by the read endpoint.
///
/// `id` is the article's rank within the latest pass and is reassigned on
/// every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Parse a feed date string.
///
/// Accepts RFC 2822 (RSS) and RFC 3339 (Atom). Dates and date-times without
/// an offset (`YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS`)
/// are read as UTC.
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) =
        DateTime::parse_from_rfc2822(value).or_else(|_| DateTime::parse_from_rfc3339(value))
    {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}
