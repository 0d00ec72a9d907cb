//! Shared application state for handlers.

use std::sync::Arc;

use crate::db::Database;
use crate::news::{Aggregator, NewsCache, SummaryStore};

/// Application state shared by all handlers.
pub struct AppState {
    /// In-process tier of the news cache.
    pub cache: Arc<NewsCache>,
    /// Durable tier of the news cache, absent in memory-only mode.
    pub store: Option<Arc<dyn SummaryStore>>,
    /// Database for newsletter subscribers, absent in memory-only mode.
    pub db: Option<Database>,
    /// Number of configured feeds.
    pub feed_count: usize,
}

impl AppState {
    /// Create state reading from an in-process cache only.
    pub fn new(cache: Arc<NewsCache>) -> Self {
        Self {
            cache,
            store: None,
            db: None,
            feed_count: 0,
        }
    }

    /// Create state sharing both cache tiers with an aggregator.
    pub fn from_aggregator(aggregator: &Aggregator) -> Self {
        Self {
            cache: aggregator.cache(),
            store: aggregator.store(),
            db: None,
            feed_count: aggregator.feeds().len(),
        }
    }

    /// Set the subscriber database.
    pub fn with_database(mut self, db: Database) -> Self {
        self.db = Some(db);
        self
    }
}
