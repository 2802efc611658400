//! Local filesystem blob store for data-URI uploads
//!
//! Decodes `data:<mime>[;params],<base64>` payloads, validates them against
//! per-kind MIME rules and a size ceiling, and writes them under a random
//! temporary name. Returned paths are relative to the public upload prefix
//! (e.g. `/uploads/news/<hex>.png`) so they can be served verbatim.

use std::io;
use std::path::{Component, Path, PathBuf};

use base64::prelude::*;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{DOCUMENTS_UPLOAD_FOLDER, NEWS_UPLOAD_FOLDER};
use crate::shared::validation::{data_uri_mime, IMAGE_EXTENSION_REGEX};

/// Maximum decoded image size (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum decoded document size (50 MiB)
pub const MAX_DOCUMENT_SIZE: usize = 50 * 1024 * 1024;

/// Kind of attachment carried by a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// News images (`data:image/...`)
    Image,
    /// Documents (`data:application/...` or `data:text/...`)
    Document,
}

impl AttachmentKind {
    /// Upload sub-folder for this kind
    pub fn folder(&self) -> &'static str {
        match self {
            AttachmentKind::Image => NEWS_UPLOAD_FOLDER,
            AttachmentKind::Document => DOCUMENTS_UPLOAD_FOLDER,
        }
    }

    /// Decoded size ceiling in bytes
    pub fn max_size(&self) -> usize {
        match self {
            AttachmentKind::Image => MAX_IMAGE_SIZE,
            AttachmentKind::Document => MAX_DOCUMENT_SIZE,
        }
    }

    fn accepts_header(&self, header: &str) -> bool {
        let header = header.to_ascii_lowercase();
        match self {
            AttachmentKind::Image => header.starts_with("data:image/"),
            AttachmentKind::Document => {
                header.starts_with("data:application/") || header.starts_with("data:text/")
            }
        }
    }

    fn header_error(&self) -> AppError {
        match self {
            AttachmentKind::Image => {
                AppError::Validation("Expected image data URI (data:image/...)".to_string())
            }
            AttachmentKind::Document => AppError::Validation(
                "Invalid document header. Expected 'data:application/...' or 'data:text/...'"
                    .to_string(),
            ),
        }
    }

    fn extension_for(&self, mime: &str) -> Option<String> {
        match self {
            AttachmentKind::Image => image_extension(mime),
            AttachmentKind::Document => document_extension(mime).map(str::to_string),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "Image",
            AttachmentKind::Document => "Document",
        }
    }
}

/// File extension for an image MIME type.
///
/// Common subtypes map to their usual extension; any other subtype is used
/// as-is (minus a structured `+suffix` or `vnd.` tree) when it is a plain
/// lowercase token. SVG is never accepted.
pub fn image_extension(mime: &str) -> Option<String> {
    let subtype = mime.strip_prefix("image/")?;
    let known = match subtype {
        "jpeg" | "jpg" | "pjpeg" => Some("jpg"),
        "tiff" => Some("tif"),
        "x-icon" | "vnd.microsoft.icon" => Some("ico"),
        _ => None,
    };
    if let Some(ext) = known {
        return Some(ext.to_string());
    }

    let base = subtype.split('+').next().unwrap_or(subtype);
    let base = base.rsplit('.').next().unwrap_or(base);
    if base == "svg" {
        return None;
    }
    IMAGE_EXTENSION_REGEX.is_match(base).then(|| base.to_string())
}

/// File extension for an accepted document MIME type
pub fn document_extension(mime: &str) -> Option<&'static str> {
    match mime {
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "application/vnd.ms-excel" => Some("xls"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        "application/vnd.ms-powerpoint" => Some("ppt"),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
            Some("pptx")
        }
        "application/rtf" => Some("rtf"),
        "text/plain" => Some("txt"),
        "application/vnd.oasis.opendocument.text" => Some("odt"),
        "application/vnd.oasis.opendocument.spreadsheet" => Some("ods"),
        "application/vnd.oasis.opendocument.presentation" => Some("odp"),
        "application/json" => Some("json"),
        "application/xml" => Some("xml"),
        "text/csv" => Some("csv"),
        _ => None,
    }
}

/// Upper bound of the decoded length, computed without decoding
fn estimated_decoded_len(encoded: &str) -> usize {
    let padding = encoded
        .bytes()
        .rev()
        .take_while(|b| *b == b'=')
        .count()
        .min(2);
    (encoded.len() * 3 / 4).saturating_sub(padding)
}

fn too_large(kind: AttachmentKind) -> AppError {
    AppError::Validation(format!(
        "{} too large (max {}MB)",
        kind.label(),
        kind.max_size() / 1024 / 1024
    ))
}

/// Validate and decode a data-URI payload, returning the bytes and file extension
fn decode_payload(payload: &str, kind: AttachmentKind) -> Result<(Vec<u8>, String)> {
    if payload.trim().is_empty() {
        return Err(AppError::Validation("Invalid base64 string".to_string()));
    }

    let (header, encoded) = payload
        .split_once(',')
        .ok_or_else(|| AppError::Validation("Missing comma in base64 string".to_string()))?;

    if !kind.accepts_header(header) {
        return Err(kind.header_error());
    }

    let mime = data_uri_mime(header)
        .ok_or_else(|| AppError::Validation(format!("Malformed data URI header: {}", header)))?;

    let extension = kind
        .extension_for(&mime)
        .ok_or_else(|| AppError::Validation(format!("Unsupported MIME type: {}", mime)))?;

    // Reject oversized payloads before allocating the decoded buffer
    if estimated_decoded_len(encoded) > kind.max_size() {
        return Err(too_large(kind));
    }

    let data = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Validation(format!("Invalid base64 payload: {}", e)))?;

    if data.is_empty() {
        return Err(AppError::Validation("File payload is empty".to_string()));
    }
    if data.len() > kind.max_size() {
        return Err(too_large(kind));
    }

    Ok((data, extension))
}

/// Filesystem-backed store for uploaded attachments
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory on disk served under the public prefix
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload root and the per-kind folders
    pub async fn ensure_layout(&self) -> io::Result<()> {
        for kind in [AttachmentKind::Image, AttachmentKind::Document] {
            fs::create_dir_all(self.root.join(kind.folder())).await?;
        }
        info!("Upload directories ready under {}", self.root.display());
        Ok(())
    }

    /// Decode, validate and write a payload under a fresh temporary name.
    ///
    /// Returns the public relative path (`/uploads/<folder>/<file>`). Never
    /// touches existing files; nothing is written when validation fails.
    pub async fn store(&self, payload: &str, kind: AttachmentKind) -> Result<String> {
        let (data, extension) = decode_payload(payload, kind)?;

        let folder = self.root.join(kind.folder());
        fs::create_dir_all(&folder).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory {}: {}",
                folder.display(),
                e
            ))
        })?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let file_path = folder.join(&filename);

        if let Err(e) = write_new_file(&file_path, &data).await {
            // Do not leave a partially written file behind
            let _ = fs::remove_file(&file_path).await;
            return Err(AppError::Internal(format!(
                "Failed to write {}: {}",
                file_path.display(),
                e
            )));
        }

        debug!(
            path = %file_path.display(),
            size = data.len(),
            "blob_store: stored upload"
        );

        Ok(format!("{}/{}/{}", self.public_prefix, kind.folder(), filename))
    }

    /// Map a stored relative path back to the filesystem.
    ///
    /// Returns `None` for paths outside the public prefix or containing
    /// anything other than plain path segments.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let rest = relative
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')?;
        let rel = Path::new(rest);

        let mut components = rel.components().peekable();
        components.peek()?;
        if components.all(|c| matches!(c, Component::Normal(_))) {
            Some(self.root.join(rel))
        } else {
            None
        }
    }

    /// Path a stored file would have once its stem becomes `stem`.
    ///
    /// Folder and extension are preserved. `None` for unmanaged paths.
    pub fn renamed_path(&self, relative: &str, stem: &str) -> Option<String> {
        self.resolve(relative)?;
        let (folder, file_name) = relative.rsplit_once('/')?;
        let new_name = match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.to_string(),
        };
        let new_relative = format!("{}/{}", folder, new_name);
        self.resolve(&new_relative).map(|_| new_relative)
    }

    /// Rename a stored file in place so its stem becomes `stem`, replacing
    /// any file already at the target. Returns the new relative path.
    pub async fn rename(&self, relative: &str, stem: &str) -> io::Result<String> {
        let from = self.resolve(relative).ok_or_else(|| unmanaged(relative))?;
        let new_relative = self
            .renamed_path(relative, stem)
            .ok_or_else(|| unmanaged(relative))?;
        let to = self
            .resolve(&new_relative)
            .ok_or_else(|| unmanaged(&new_relative))?;

        if from != to {
            fs::rename(&from, &to).await?;
        }

        Ok(new_relative)
    }

    /// Delete a stored file. Returns `false` when it did not exist.
    pub async fn remove(&self, relative: &str) -> io::Result<bool> {
        let path = self.resolve(relative).ok_or_else(|| unmanaged(relative))?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Attachment already missing on disk: {}", path.display());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn unmanaged(relative: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Path is not managed by the upload store: {}", relative),
    )
}

async fn write_new_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}
