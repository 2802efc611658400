use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::documents::dtos::{
    CreateDocumentDto, DocumentResponseDto, UpdateDocumentDto,
};
use crate::features::documents::models::{Document, DocumentChanges};
use crate::features::documents::repositories::DocumentRepository;
use crate::modules::storage::{AttachmentKind, AttachmentManager};
use crate::shared::validation::parse_entity_id;

fn not_found() -> AppError {
    AppError::NotFound("Document not found".to_string())
}

/// Service for published documents and their files
pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
    attachments: Arc<AttachmentManager>,
}

impl DocumentService {
    pub fn new(repo: Arc<dyn DocumentRepository>, attachments: Arc<AttachmentManager>) -> Self {
        Self { repo, attachments }
    }

    pub async fn create(&self, dto: CreateDocumentDto) -> Result<DocumentResponseDto> {
        let id = Uuid::now_v7();
        let document_url = self
            .attachments
            .attach(&dto.document_url, AttachmentKind::Document, id)
            .await?;

        let document = Document {
            id,
            name: dto.name,
            description: dto.description,
            author: dto.author,
            availability_date: dto.availability_date,
            document_url,
            created_at: Utc::now(),
        };

        match self.repo.insert(&document).await {
            Ok(created) => {
                tracing::info!(
                    "Document created: id={}, file={}",
                    created.id,
                    created.document_url
                );
                Ok(created.into())
            }
            Err(e) => {
                self.attachments.discard(&document.document_url).await;
                Err(e)
            }
        }
    }

    /// List documents ordered by name
    pub async fn list(&self) -> Result<Vec<DocumentResponseDto>> {
        let items = self.repo.list().await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> Result<DocumentResponseDto> {
        let id = parse_entity_id(id, "document")?;
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: &str, dto: UpdateDocumentDto) -> Result<DocumentResponseDto> {
        let id = parse_entity_id(id, "document")?;
        let _guard = self.attachments.lock(id).await;

        let existing = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if dto.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let staged = match dto.document_payload() {
            Some(payload) => Some(
                self.attachments
                    .stage(payload, AttachmentKind::Document, id)
                    .await?,
            ),
            None => None,
        };

        let changes = DocumentChanges {
            name: dto.name,
            description: dto.description,
            author: dto.author,
            availability_date: dto.availability_date,
            document_url: staged.as_ref().map(|s| s.final_path().to_string()),
        };

        let mut updated = match self.repo.update(id, &changes).await {
            Ok(Some(updated)) => updated,
            result => {
                if let Some(staged) = staged {
                    self.attachments.abandon(staged).await;
                }
                return Err(result.err().unwrap_or_else(not_found));
            }
        };

        if let Some(staged) = staged {
            let final_path = staged.final_path().to_string();
            let committed = self.attachments.commit(staged).await;
            if committed != final_path {
                updated = self.repoint_file(updated, committed).await;
            }
        }

        self.attachments
            .release_superseded(Some(&existing.document_url), Some(&updated.document_url))
            .await;

        Ok(updated.into())
    }

    /// Point the record at the temporary file path left by a failed rename
    async fn repoint_file(&self, document: Document, document_url: String) -> Document {
        let changes = DocumentChanges {
            document_url: Some(document_url),
            ..Default::default()
        };

        match self.repo.update(document.id, &changes).await {
            Ok(Some(repointed)) => repointed,
            Ok(None) => document,
            Err(e) => {
                tracing::warn!("Could not repoint file of document {}: {}", document.id, e);
                document
            }
        }
    }

    /// Delete a document record, then its file
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_entity_id(id, "document")?;
        let _guard = self.attachments.lock(id).await;

        let existing = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if !self.repo.delete(id).await? {
            return Err(not_found());
        }

        self.attachments.discard(&existing.document_url).await;

        tracing::info!("Document deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_test_attachments, document_dto, document_payload, InMemoryDocumentRepository,
    };
    use tempfile::TempDir;

    fn create_test_service() -> (DocumentService, Arc<AttachmentManager>, TempDir) {
        let (attachments, temp_dir) = create_test_attachments();
        let service = DocumentService::new(
            Arc::new(InMemoryDocumentRepository::default()),
            Arc::clone(&attachments),
        );
        (service, attachments, temp_dir)
    }

    fn file_exists(attachments: &AttachmentManager, path: &str) -> bool {
        attachments.blob_store().resolve(path).unwrap().exists()
    }

    #[tokio::test]
    async fn test_create_pdf_is_named_after_document_id() {
        let (service, attachments, _temp) = create_test_service();

        let created = service.create(document_dto("Annual report")).await.unwrap();

        assert_eq!(
            created.document_url,
            format!("/uploads/documents/{}.pdf", created.id)
        );
        assert!(file_exists(&attachments, &created.document_url));
    }

    #[tokio::test]
    async fn test_create_rejects_unlisted_mime_type() {
        let (service, _attachments, temp) = create_test_service();
        let dto = CreateDocumentDto {
            document_url: document_payload("application/x-msdownload", b"MZ"),
            ..document_dto("Installer")
        };

        let err = service.create(dto).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Unsupported MIME type")));
        let dir = temp.path().join("uploads/documents");
        assert_eq!(std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0), 0);
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let (service, _attachments, _temp) = create_test_service();
        service.create(document_dto("Zoning plan")).await.unwrap();
        service.create(document_dto("Annual report")).await.unwrap();
        service.create(document_dto("Budget")).await.unwrap();

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, vec!["Annual report", "Budget", "Zoning plan"]);
    }

    #[tokio::test]
    async fn test_update_with_new_file_type_removes_previous_file() {
        let (service, attachments, _temp) = create_test_service();
        let created = service.create(document_dto("Annual report")).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                UpdateDocumentDto {
                    document_url: Some(document_payload("text/csv", b"a,b\n1,2\n")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            updated.document_url,
            format!("/uploads/documents/{}.csv", created.id)
        );
        assert!(file_exists(&attachments, &updated.document_url));
        assert!(!file_exists(&attachments, &created.document_url));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_serving_previous_file() {
        let (attachments, temp) = create_test_attachments();
        let repo = Arc::new(InMemoryDocumentRepository::default());
        let service = DocumentService::new(repo.clone(), Arc::clone(&attachments));
        let created = service.create(document_dto("Annual report")).await.unwrap();
        let before = std::fs::read(
            attachments
                .blob_store()
                .resolve(&created.document_url)
                .unwrap(),
        )
        .unwrap();

        repo.fail_updates();
        let result = service
            .update(
                &created.id.to_string(),
                UpdateDocumentDto {
                    document_url: Some(document_payload("application/pdf", b"%PDF-1.7 new")),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_err());
        let after = std::fs::read(
            attachments
                .blob_store()
                .resolve(&created.document_url)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(after, before);
        let dir = temp.path().join("uploads/documents");
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_update_same_file_type_replaces_content() {
        let (service, attachments, _temp) = create_test_service();
        let created = service.create(document_dto("Annual report")).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                UpdateDocumentDto {
                    document_url: Some(document_payload("application/pdf", b"%PDF-1.7 new")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.document_url, created.document_url);
        let on_disk =
            std::fs::read(attachments.blob_store().resolve(&updated.document_url).unwrap())
                .unwrap();
        assert_eq!(on_disk, b"%PDF-1.7 new");
    }

    #[tokio::test]
    async fn test_update_metadata_keeps_file() {
        let (service, attachments, _temp) = create_test_service();
        let created = service.create(document_dto("Annual report")).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                UpdateDocumentDto {
                    author: Some("Planning office".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.author, "Planning office");
        assert_eq!(updated.document_url, created.document_url);
        assert!(file_exists(&attachments, &updated.document_url));
    }

    #[tokio::test]
    async fn test_update_with_no_fields_is_rejected() {
        let (service, _attachments, _temp) = create_test_service();
        let created = service.create(document_dto("Annual report")).await.unwrap();

        let err = service
            .update(&created.id.to_string(), UpdateDocumentDto::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "No fields to update"));
    }

    #[tokio::test]
    async fn test_delete_twice_returns_not_found() {
        let (service, attachments, _temp) = create_test_service();
        let created = service.create(document_dto("Annual report")).await.unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(!file_exists(&attachments, &created.document_url));
        assert!(matches!(
            service.delete(&id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid_argument() {
        let (service, _attachments, _temp) = create_test_service();

        assert!(matches!(
            service.get("123").await.unwrap_err(),
            AppError::InvalidArgument(_)
        ));
        assert!(matches!(
            service.get(&Uuid::now_v7().to_string()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
