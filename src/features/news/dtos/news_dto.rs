use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::news::models::News;

/// Request DTO for creating a news article
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateNewsDto {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    /// Free-text category label used for filtering
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// Image as a data URI (`data:image/<type>;base64,...`). Empty or absent means no image.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub img_url: Option<String>,
}

/// Request DTO for updating a news article. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateNewsDto {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,

    /// Replacement image as a data URI; the previous image file is removed.
    /// An empty string keeps the current image.
    pub img_url: Option<String>,
}

impl UpdateNewsDto {
    /// Image payload, ignoring empty strings
    pub fn image_payload(&self) -> Option<&str> {
        self.img_url.as_deref().filter(|s| !s.is_empty())
    }

    /// True when no field was sent. An empty `img_url` still counts as sent.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.img_url.is_none()
    }
}

/// Query params for listing news
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListNewsQuery {
    /// Only return articles with exactly this category
    pub category: Option<String>,
}

impl ListNewsQuery {
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// Response DTO for a news article
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponseDto {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    /// Relative URL of the image under `/uploads/news/`, or null
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<News> for NewsResponseDto {
    fn from(n: News) -> Self {
        Self {
            id: n.id,
            title: n.title,
            category: n.category,
            content: n.content,
            img_url: n.img_url,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}
