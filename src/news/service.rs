//! Read side of the news cache.

use tracing::warn;

use crate::news::cache::NewsCache;
use crate::news::repository::SummaryStore;
use crate::news::types::ArticleSummary;

/// Latest aggregated articles ordered by id.
///
/// Prefers the durable store and falls back to the in-process cache when the
/// store is absent or fails. Never errors; an empty list means no pass has
/// committed yet.
pub async fn latest_summaries(
    store: Option<&dyn SummaryStore>,
    cache: &NewsCache,
) -> Vec<ArticleSummary> {
    if let Some(store) = store {
        match store.read_all().await {
            Ok(articles) => return articles,
            Err(e) => warn!("Article store read failed, serving in-memory cache: {}", e),
        }
    }

    cache.articles().await.as_ref().clone()
}
