use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a published document
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub author: String,
    pub availability_date: DateTime<Utc>,
    /// Relative path of the document file
    pub document_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub availability_date: Option<DateTime<Utc>>,
    pub document_url: Option<String>,
}
