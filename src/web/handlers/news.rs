//! News handlers for Web API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::news::{latest_summaries, ArticleSummary};
use crate::web::dto::NewsStatusResponse;
use crate::web::handlers::AppState;

/// GET /api/ai-news-rss - Latest aggregated AI news.
///
/// Always 200. An empty array means no pass has completed yet.
pub async fn get_news(State(state): State<Arc<AppState>>) -> Json<Vec<ArticleSummary>> {
    Json(latest_summaries(state.store.as_deref(), &state.cache).await)
}

/// GET /api/ai-news-rss/status - State of the in-process cache.
pub async fn get_news_status(State(state): State<Arc<AppState>>) -> Json<NewsStatusResponse> {
    let snapshot = state.cache.snapshot().await;

    Json(NewsStatusResponse {
        last_updated: snapshot.last_updated.map(|dt| dt.to_rfc3339()),
        article_count: snapshot.articles.len(),
        feed_count: state.feed_count,
    })
}
