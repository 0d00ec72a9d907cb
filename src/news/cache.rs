//! In-process tier of the news cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::news::types::ArticleSummary;

/// One committed aggregation result.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    /// Articles ordered by id.
    pub articles: Arc<Vec<ArticleSummary>>,
    /// When the snapshot was committed. `None` before the first pass.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Latest aggregation result held in memory.
///
/// Only the aggregator writes it; everything else reads. Readers always see
/// a whole snapshot, never a pass in progress.
#[derive(Debug, Default)]
pub struct NewsCache {
    inner: RwLock<CacheSnapshot>,
}

impl NewsCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> CacheSnapshot {
        self.inner.read().await.clone()
    }

    /// Current articles.
    pub async fn articles(&self) -> Arc<Vec<ArticleSummary>> {
        Arc::clone(&self.inner.read().await.articles)
    }

    /// Timestamp of the last committed pass.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_updated
    }

    /// Swap in a new snapshot.
    pub(crate) async fn replace(&self, articles: Vec<ArticleSummary>, at: DateTime<Utc>) {
        let mut guard = self.inner.write().await;
        *guard = CacheSnapshot {
            articles: Arc::new(articles),
            last_updated: Some(at),
        };
    }
}
