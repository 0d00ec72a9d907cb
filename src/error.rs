//! Error types for AI Inventory.

use thiserror::Error;

/// Common error type for AI Inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Database error.
    ///
    /// Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single feed could not be fetched or parsed.
    #[error("feed fetch error: {0}")]
    FeedFetch(String),

    /// The durable article store rejected a read or write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An aggregation pass collected nothing to publish.
    #[error("no articles collected from any feed")]
    NoArticles,

    /// Outbound mail could not be handed off.
    #[error("mail error: {0}")]
    Mail(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for InventoryError {
    fn from(e: sqlx::Error) -> Self {
        InventoryError::Database(e.to_string())
    }
}

/// Result type alias for AI Inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
