use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    CreateDocumentDto, DocumentResponseDto, UpdateDocumentDto,
};
use crate::features::documents::services::DocumentService;
use crate::shared::types::{ApiResponse, Meta};

/// Publish a document
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentDto,
    responses(
        (status = 201, description = "Document created", body = ApiResponse<DocumentResponseDto>),
        (status = 400, description = "Validation error or unsupported file type"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn create_document(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    AppJson(dto): AppJson<CreateDocumentDto>,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let document = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(document),
            Some("Document created successfully".to_string()),
            None,
        )),
    ))
}

/// List documents ordered by name
#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "List of documents", body = ApiResponse<Vec<DocumentResponseDto>>)
    ),
    tag = "documents"
)]
pub async fn list_documents(
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let items = service.list().await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document details", body = ApiResponse<DocumentResponseDto>),
        (status = 400, description = "Invalid document ID"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DocumentResponseDto>>> {
    let document = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(document), None, None)))
}

/// Update a document
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated", body = ApiResponse<DocumentResponseDto>),
        (status = 400, description = "Validation error, invalid ID or nothing to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn update_document(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateDocumentDto>,
) -> Result<Json<ApiResponse<DocumentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let document = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(document),
        Some("Document updated successfully".to_string()),
        None,
    )))
}

/// Delete a document and its file
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 400, description = "Invalid document ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
