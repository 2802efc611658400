use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::news::models::{News, NewsChanges};

/// Persistence for news articles
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Insert a record whose id was allocated by the caller
    async fn insert(&self, news: &News) -> Result<News>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<News>>;

    /// All articles, newest first, optionally restricted to one category
    async fn list(&self, category: Option<&str>) -> Result<Vec<News>>;

    /// Apply a partial update. Returns `None` when no record has this id.
    async fn update(&self, id: Uuid, changes: &NewsChanges) -> Result<Option<News>>;

    /// Returns `false` when no record had this id
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct PgNewsRepository {
    pool: PgPool,
}

impl PgNewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsRepository for PgNewsRepository {
    async fn insert(&self, news: &News) -> Result<News> {
        sqlx::query_as::<_, News>(
            r#"
            INSERT INTO news (id, title, category, content, img_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, category, content, img_url, created_at, updated_at
            "#,
        )
        .bind(news.id)
        .bind(&news.title)
        .bind(&news.category)
        .bind(&news.content)
        .bind(&news.img_url)
        .bind(news.created_at)
        .bind(news.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert news: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<News>> {
        sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, category, content, img_url, created_at, updated_at
            FROM news
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<News>> {
        sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, category, content, img_url, created_at, updated_at
            FROM news
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list news: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update(&self, id: Uuid, changes: &NewsChanges) -> Result<Option<News>> {
        sqlx::query_as::<_, News>(
            r#"
            UPDATE news
            SET title = COALESCE($2, title),
                category = COALESCE($3, category),
                content = COALESCE($4, content),
                img_url = COALESCE($5, img_url),
                updated_at = $6
            WHERE id = $1
            RETURNING id, title, category, content, img_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.category)
        .bind(&changes.content)
        .bind(&changes.img_url)
        .bind(changes.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update news {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
