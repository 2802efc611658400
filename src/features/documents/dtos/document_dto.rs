use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::documents::models::Document;
use crate::shared::datetime::{
    deserialize_flexible_datetime, deserialize_optional_flexible_datetime,
};

/// Request DTO for publishing a document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(alias = "autor")]
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,

    /// Date from which the document is available. RFC 3339, a naive
    /// date-time (read as UTC) or a bare date are accepted.
    #[serde(
        alias = "date_disponibility",
        deserialize_with = "deserialize_flexible_datetime"
    )]
    pub availability_date: DateTime<Utc>,

    /// Document file as a data URI (`data:application/pdf;base64,...`)
    #[schema(example = "data:application/pdf;base64,JVBERi0xLjQK")]
    #[validate(length(min = 1, message = "A document file is required"))]
    pub document_url: String,
}

/// Request DTO for updating a document. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    #[serde(alias = "autor")]
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,

    #[serde(
        default,
        alias = "date_disponibility",
        deserialize_with = "deserialize_optional_flexible_datetime"
    )]
    pub availability_date: Option<DateTime<Utc>>,

    /// Replacement file as a data URI; the previous file is removed
    pub document_url: Option<String>,
}

impl UpdateDocumentDto {
    pub fn document_payload(&self) -> Option<&str> {
        self.document_url.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.availability_date.is_none()
            && self.document_payload().is_none()
    }
}

/// Response DTO for a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub author: String,
    pub availability_date: DateTime<Utc>,
    /// Relative URL of the file under `/uploads/documents/`
    pub document_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponseDto {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            author: d.author,
            availability_date: d.availability_date,
            document_url: d.document_url,
            created_at: d.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_dto_accepts_legacy_field_names() {
        let dto: CreateDocumentDto = serde_json::from_value(json!({
            "name": "Annual report",
            "description": "Yearly summary",
            "autor": "Water board",
            "date_disponibility": "2024-03-01T00:00:00Z",
            "document_url": "data:application/pdf;base64,JVBERi0="
        }))
        .unwrap();

        assert_eq!(dto.author, "Water board");
        assert_eq!(dto.availability_date.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    fn create_body(date: &str) -> serde_json::Value {
        json!({
            "name": "Annual report",
            "description": "Yearly summary",
            "autor": "Water board",
            "date_disponibility": date,
            "document_url": "data:application/pdf;base64,JVBERi0="
        })
    }

    #[test]
    fn test_create_dto_accepts_naive_datetime_and_bare_date() {
        let expected = "2024-03-01T00:00:00+00:00";

        let naive: CreateDocumentDto =
            serde_json::from_value(create_body("2024-03-01T00:00:00")).unwrap();
        let bare: CreateDocumentDto = serde_json::from_value(create_body("2024-03-01")).unwrap();
        let offset: CreateDocumentDto =
            serde_json::from_value(create_body("2024-03-01T01:00:00+01:00")).unwrap();

        assert_eq!(naive.availability_date.to_rfc3339(), expected);
        assert_eq!(bare.availability_date.to_rfc3339(), expected);
        assert_eq!(offset.availability_date.to_rfc3339(), expected);
    }

    #[test]
    fn test_create_dto_rejects_unparseable_date() {
        let result = serde_json::from_value::<CreateDocumentDto>(create_body("next week"));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_dto_date_is_optional_and_lenient() {
        let absent: UpdateDocumentDto = serde_json::from_value(json!({ "name": "x" })).unwrap();
        assert!(absent.availability_date.is_none());

        let null: UpdateDocumentDto =
            serde_json::from_value(json!({ "availability_date": null })).unwrap();
        assert!(null.availability_date.is_none());

        let bare: UpdateDocumentDto =
            serde_json::from_value(json!({ "date_disponibility": "2024-03-01" })).unwrap();
        assert_eq!(
            bare.availability_date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-03-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_create_dto_requires_document() {
        let dto = CreateDocumentDto {
            name: "Annual report".to_string(),
            description: "Yearly summary".to_string(),
            author: "Water board".to_string(),
            availability_date: Utc::now(),
            document_url: String::new(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_is_empty() {
        assert!(UpdateDocumentDto::default().is_empty());
        assert!(UpdateDocumentDto {
            document_url: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
        assert!(!UpdateDocumentDto {
            author: Some("x".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
