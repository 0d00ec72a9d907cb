//! Feed fetching over HTTP.
//!
//! The aggregator talks to feeds through the [`FeedReader`] trait so that
//! tests can substitute canned feeds for the network.

use std::time::Duration;

use axum::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::NewsConfig;
use crate::error::{InventoryError, Result};
use crate::news::parser::parse_feed;
use crate::news::types::ParsedFeed;

/// User agent string for feed fetching.
const USER_AGENT: &str = "AI-Inventory/0.1 (News Aggregator)";

/// Fetches and parses a single feed.
#[async_trait]
pub trait FeedReader: Send + Sync {
    /// Fetch the feed at `url`.
    ///
    /// Any failure (network, HTTP status, size limit, parse) is reported as
    /// [`InventoryError::FeedFetch`].
    async fn fetch(&self, url: &str) -> Result<ParsedFeed>;
}

/// Feed reader backed by reqwest with timeouts and a size cap.
pub struct HttpFeedReader {
    client: Client,
    max_feed_size: u64,
    max_snippet_length: usize,
}

impl HttpFeedReader {
    /// Create a reader from the news configuration.
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| InventoryError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
            max_snippet_length: config.max_summary_length,
        })
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_feed_size {
            return Err(InventoryError::FeedFetch(format!(
                "feed too large: {} bytes (max {} bytes)",
                size, self.max_feed_size
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        debug!("Fetching feed {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InventoryError::FeedFetch(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(InventoryError::FeedFetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InventoryError::FeedFetch(format!("failed to read response: {}", e)))?;

        self.check_size(bytes.len() as u64)?;

        parse_feed(&bytes, self.max_snippet_length)
    }
}
