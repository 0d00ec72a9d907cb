//! Response DTOs for Web API.

use serde::Serialize;

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Subscriber count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Number of subscribers.
    pub count: i64,
}

/// News aggregation status.
#[derive(Debug, Serialize)]
pub struct NewsStatusResponse {
    /// When the last pass committed (RFC 3339), or null before the first pass.
    pub last_updated: Option<String>,
    /// Articles held in memory.
    pub article_count: usize,
    /// Configured feeds.
    pub feed_count: usize,
}
