//! Newsletter handlers for Web API.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::db::{DbPool, SubscriberRepository};
use crate::web::dto::{CountResponse, MessageResponse, SubscribeRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

fn subscriber_pool(state: &AppState) -> Result<&DbPool, ApiError> {
    state
        .db
        .as_ref()
        .map(|db| db.pool())
        .ok_or_else(|| ApiError::service_unavailable("Newsletter is temporarily unavailable"))
}

/// POST /api/subscribe - Subscribe an email address to the newsletter.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req
        .email()
        .ok_or_else(|| ApiError::bad_request("Email required"))?;

    let pool = subscriber_pool(&state)?;
    let repo = SubscriberRepository::new(pool);

    match repo.create(email).await? {
        Some(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "New newsletter subscriber");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("Subscribed successfully")),
            ))
        }
        None => Err(ApiError::conflict("Already subscribed")),
    }
}

/// GET /api/subscribers/count - Number of newsletter subscribers.
pub async fn subscriber_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountResponse>, ApiError> {
    let pool = subscriber_pool(&state)?;

    let count = SubscriberRepository::new(pool).count().await?;

    Ok(Json(CountResponse { count }))
}
