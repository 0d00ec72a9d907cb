//! Aggregation pass: fetch every feed, merge, rank, and publish.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::NewsConfig;
use crate::news::cache::NewsCache;
use crate::news::fetcher::FeedReader;
use crate::news::image::extract_image;
use crate::news::repository::SummaryStore;
use crate::news::types::{
    ArticleDraft, ArticleSummary, ParsedFeed, DEFAULT_TOP_N, SUMMARY_PLACEHOLDER,
};
use crate::{InventoryError, Result};

/// What a call to [`Aggregator::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was committed with this many articles.
    Refreshed(usize),
    /// Another pass was already running; this trigger was dropped.
    Skipped,
}

/// Owns the aggregation pass and both cache tiers it writes.
pub struct Aggregator {
    feeds: Vec<String>,
    reader: Arc<dyn FeedReader>,
    store: Option<Arc<dyn SummaryStore>>,
    cache: Arc<NewsCache>,
    top_n: usize,
    summary_placeholder: String,
    gate: Mutex<()>,
}

impl Aggregator {
    /// Create an aggregator over `feeds` with default limits.
    pub fn new(feeds: Vec<String>, reader: Arc<dyn FeedReader>) -> Self {
        Self {
            feeds,
            reader,
            store: None,
            cache: Arc::new(NewsCache::new()),
            top_n: DEFAULT_TOP_N,
            summary_placeholder: SUMMARY_PLACEHOLDER.to_string(),
            gate: Mutex::new(()),
        }
    }

    /// Create an aggregator from the news configuration.
    pub fn from_config(config: &NewsConfig, reader: Arc<dyn FeedReader>) -> Self {
        Self::new(config.feeds.clone(), reader)
            .with_top_n(config.top_n)
            .with_summary_placeholder(config.summary_placeholder.clone())
    }

    /// Persist results to a durable store.
    pub fn with_store(mut self, store: Arc<dyn SummaryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set how many articles a pass keeps.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the summary used when an item has none.
    pub fn with_summary_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.summary_placeholder = placeholder.into();
        self
    }

    /// In-process cache written by this aggregator.
    pub fn cache(&self) -> Arc<NewsCache> {
        Arc::clone(&self.cache)
    }

    /// Durable store written by this aggregator, if any.
    pub fn store(&self) -> Option<Arc<dyn SummaryStore>> {
        self.store.clone()
    }

    /// Configured feed URLs.
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// Run one aggregation pass.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without doing anything if a pass is
    /// already in flight. On error neither cache tier is touched.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!("Aggregation pass already running, skipping trigger");
            return Ok(RefreshOutcome::Skipped);
        };

        let drafts = self.collect().await;
        if drafts.is_empty() {
            return Err(InventoryError::NoArticles);
        }

        let articles = rank(drafts, self.top_n);

        if let Some(store) = &self.store {
            store.replace_all(&articles).await?;
        }

        let count = articles.len();
        let now = Utc::now();
        self.cache.replace(articles, now).await;
        info!("AI news cache updated at {} ({} articles)", now.to_rfc3339(), count);

        Ok(RefreshOutcome::Refreshed(count))
    }

    /// Fetch every feed concurrently and normalize the items of those that succeeded.
    async fn collect(&self) -> Vec<ArticleDraft> {
        let fetches = self.feeds.iter().map(|url| async move {
            (url.as_str(), self.reader.fetch(url).await)
        });

        let mut drafts = Vec::new();
        let mut failed = 0usize;

        for (url, result) in join_all(fetches).await {
            match result {
                Ok(feed) => {
                    debug!("Feed {} returned {} item(s)", url, feed.items.len());
                    drafts.extend(normalize_feed(url, feed, &self.summary_placeholder));
                }
                Err(e) => {
                    failed += 1;
                    warn!("Skipping feed {}: {}", url, e);
                }
            }
        }

        if failed == self.feeds.len() && !self.feeds.is_empty() {
            error!("All {} feed(s) failed in this pass", failed);
        }

        drafts
    }
}

/// Turn one feed's items into drafts. Items without a title are dropped.
pub fn normalize_feed(url: &str, feed: ParsedFeed, placeholder: &str) -> Vec<ArticleDraft> {
    let source = feed.title.unwrap_or_else(|| url.to_string());

    feed.items
        .into_iter()
        .filter_map(|item| {
            let image = extract_image(&item);
            let title = item.title?;
            Some(ArticleDraft {
                title,
                summary: item
                    .content_snippet
                    .unwrap_or_else(|| placeholder.to_string()),
                link: item.link.unwrap_or_default(),
                source: source.clone(),
                pub_date: item.pub_date.unwrap_or_default(),
                image,
            })
        })
        .collect()
}

/// Sort newest first, keep `top_n`, and number them from zero.
///
/// Undated or unparseable items sort after every dated one; ties keep feed order.
pub fn rank(mut drafts: Vec<ArticleDraft>, top_n: usize) -> Vec<ArticleSummary> {
    drafts.sort_by_cached_key(|d| std::cmp::Reverse(d.published_at()));
    drafts
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, d)| d.into_summary(i as i64))
        .collect()
}
