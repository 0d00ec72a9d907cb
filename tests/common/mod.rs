//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use ai_inventory::news::{FeedReader, ParsedFeed, RawFeedItem};
use ai_inventory::{InventoryError, Result};
use axum::async_trait;
use chrono::{Duration, TimeZone, Utc};

/// Feed reader serving canned feeds keyed by URL.
///
/// URLs without a feed fail with `FeedFetch`. Feeds can be swapped between
/// passes.
#[derive(Default)]
pub struct ScriptedReader {
    feeds: Mutex<HashMap<String, ParsedFeed>>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, url: &str, feed: ParsedFeed) -> Self {
        self.set_feed(url, feed);
        self
    }

    pub fn set_feed(&self, url: &str, feed: ParsedFeed) {
        self.feeds.lock().unwrap().insert(url.to_string(), feed);
    }

    pub fn remove_feed(&self, url: &str) {
        self.feeds.lock().unwrap().remove(url);
    }
}

#[async_trait]
impl FeedReader for ScriptedReader {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        self.feeds
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| InventoryError::FeedFetch(format!("connection refused: {url}")))
    }
}

/// Build a feed with `count` items whose dates are `start_hour + i * step_hours`
/// hours after 2025-01-01T00:00:00Z.
pub fn dated_feed(name: &str, count: usize, start_hour: i64, step_hours: i64) -> ParsedFeed {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let items = (0..count)
        .map(|i| {
            let at = base + Duration::hours(start_hour + i as i64 * step_hours);
            RawFeedItem::new(format!("{name} item {i}"))
                .with_link(format!("https://{name}.example/{i}"))
                .with_pub_date(at.to_rfc2822())
                .with_snippet(format!("{name} snippet {i}"))
        })
        .collect();

    ParsedFeed {
        title: Some(name.to_string()),
        items,
    }
}
