//! Durable tier of the news cache.

use axum::async_trait;

use crate::db::DbPool;
use crate::news::types::ArticleSummary;
use crate::{InventoryError, Result};

/// Persistent collection holding the latest aggregation result.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Discard the previous contents and store `articles` in one step.
    async fn replace_all(&self, articles: &[ArticleSummary]) -> Result<()>;

    /// Current contents ordered by id ascending.
    async fn read_all(&self) -> Result<Vec<ArticleSummary>>;
}

/// Row type for a news article from database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    summary: String,
    link: String,
    source: String,
    pub_date: String,
    image: Option<String>,
}

impl From<ArticleRow> for ArticleSummary {
    fn from(row: ArticleRow) -> Self {
        ArticleSummary {
            id: row.id,
            title: row.title,
            summary: row.summary,
            link: row.link,
            source: row.source,
            pub_date: row.pub_date,
            image: row.image,
        }
    }
}

/// SQLite-backed article store.
///
/// Holds its own pool handle so it can be shared as a trait object.
#[derive(Clone)]
pub struct ArticleRepository {
    pool: DbPool,
}

impl ArticleRepository {
    /// Create a new repository instance.
    pub fn new(pool: &DbPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Count stored articles.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news_articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| InventoryError::StoreUnavailable(e.to_string()))?;
        Ok(count)
    }
}

#[async_trait]
impl SummaryStore for ArticleRepository {
    async fn replace_all(&self, articles: &[ArticleSummary]) -> Result<()> {
        let store_err = |e: sqlx::Error| InventoryError::StoreUnavailable(e.to_string());

        let mut tx = self.pool.begin().await.map_err(store_err)?;

        sqlx::query("DELETE FROM news_articles")
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        for article in articles {
            sqlx::query(
                r#"
                INSERT INTO news_articles (id, title, summary, link, source, pub_date, image)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.summary)
            .bind(&article.link)
            .bind(&article.source)
            .bind(&article.pub_date)
            .bind(&article.image)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        }

        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<ArticleSummary>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, summary, link, source, pub_date, image
            FROM news_articles
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| InventoryError::StoreUnavailable(e.to_string()))?;

        Ok(rows.into_iter().map(ArticleSummary::from).collect())
    }
}
