use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a news article
#[derive(Debug, Clone, FromRow)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    /// Relative path of the article image, if any
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a news article; `None` fields are left untouched
#[derive(Debug, Clone)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub img_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}
