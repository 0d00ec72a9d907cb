//! Newsletter subscriber repository.

use super::DbPool;
use crate::{InventoryError, Result};

/// Newsletter subscriber entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscriber {
    /// Subscriber ID.
    pub id: i64,
    /// Normalized email address.
    pub email: String,
    /// Subscription timestamp.
    pub subscribed_at: String,
}

/// Trim and lowercase an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for subscriber operations.
pub struct SubscriberRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SubscriberRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add a subscriber.
    ///
    /// Returns `None` if the address is already subscribed.
    pub async fn create(&self, email: &str) -> Result<Option<Subscriber>> {
        let email = normalize_email(email);

        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO subscribers (email) VALUES ($1)
             ON CONFLICT(email) DO NOTHING RETURNING id",
        )
        .bind(&email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| InventoryError::Database(e.to_string()))?;

        match id {
            Some(id) => self.get_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Get a subscriber by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Subscriber>> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            "SELECT id, email, subscribed_at FROM subscribers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| InventoryError::Database(e.to_string()))?;

        Ok(subscriber)
    }

    /// Get a subscriber by email. The address is normalized first.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            "SELECT id, email, subscribed_at FROM subscribers WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| InventoryError::Database(e.to_string()))?;

        Ok(subscriber)
    }

    /// All subscribed addresses in signup order.
    pub async fn list_emails(&self) -> Result<Vec<String>> {
        let emails: Vec<String> = sqlx::query_scalar("SELECT email FROM subscribers ORDER BY id")
            .fetch_all(self.pool)
            .await
            .map_err(|e| InventoryError::Database(e.to_string()))?;
        Ok(emails)
    }

    /// Count subscribers.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
            .fetch_one(self.pool)
            .await
            .map_err(|e| InventoryError::Database(e.to_string()))?;
        Ok(count)
    }
}
