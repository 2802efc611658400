use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::documents::models::{Document, DocumentChanges};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, document: &Document) -> Result<Document>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>>;

    /// All documents ordered by name
    async fn list(&self) -> Result<Vec<Document>>;

    async fn update(&self, id: Uuid, changes: &DocumentChanges) -> Result<Option<Document>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, name, description, author, availability_date, document_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, author, availability_date, document_url, created_at
            "#,
        )
        .bind(document.id)
        .bind(&document.name)
        .bind(&document.description)
        .bind(&document.author)
        .bind(document.availability_date)
        .bind(&document.document_url)
        .bind(document.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert document: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, name, description, author, availability_date, document_url, created_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, name, description, author, availability_date, document_url, created_at
            FROM documents
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, id: Uuid, changes: &DocumentChanges) -> Result<Option<Document>> {
        sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                author = COALESCE($4, author),
                availability_date = COALESCE($5, availability_date),
                document_url = COALESCE($6, document_url)
            WHERE id = $1
            RETURNING id, name, description, author, availability_date, document_url, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.author)
        .bind(changes.availability_date)
        .bind(&changes.document_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update document {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
