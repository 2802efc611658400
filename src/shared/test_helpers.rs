//! In-memory repositories and fixtures shared by unit and router tests

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::*;
use chrono::Utc;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use tempfile::TempDir;
use uuid::Uuid;

use crate::core::config::{
    AdminSeedConfig, AppConfig, AuthConfig, Config, DatabaseConfig, StorageConfig, SwaggerConfig,
};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::User;
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::services::hash_password;
use crate::features::documents::dtos::CreateDocumentDto;
use crate::features::documents::models::{Document, DocumentChanges};
use crate::features::documents::repositories::DocumentRepository;
use crate::features::news::dtos::CreateNewsDto;
use crate::features::news::models::{News, NewsChanges};
use crate::features::news::repositories::NewsRepository;
use crate::features::stations::dtos::CreateStationDto;
use crate::features::stations::models::{Station, StationChanges};
use crate::features::stations::repositories::StationRepository;
use crate::modules::storage::{AttachmentManager, BlobStore};

// ==================== Config ====================

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-with-at-least-32-characters".to_string(),
        token_ttl: Duration::from_secs(30 * 60),
        jwt_leeway: Duration::from_secs(60),
    }
}

pub fn test_admin_config() -> AdminSeedConfig {
    AdminSeedConfig {
        enabled: true,
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        password: "admin-password".to_string(),
    }
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 72 * 1024 * 1024,
            public_read_endpoints: true,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 1,
            max_lifetime_secs: 1,
        },
        auth: test_auth_config(),
        admin: test_admin_config(),
        storage: StorageConfig {
            upload_dir: upload_dir.to_path_buf(),
            public_prefix: StorageConfig::PUBLIC_PREFIX.to_string(),
        },
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "Test API".to_string(),
            version: "0.0.0".to_string(),
            description: "Test".to_string(),
        },
    }
}

// ==================== Attachments ====================

/// Attachment manager rooted at `<tempdir>/uploads`
pub fn create_test_attachments() -> (Arc<AttachmentManager>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = BlobStore::new(
        temp_dir.path().join("uploads"),
        StorageConfig::PUBLIC_PREFIX,
    );
    (Arc::new(AttachmentManager::new(store)), temp_dir)
}

pub fn image_payload(mime: &str, body: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(body))
}

pub fn document_payload(mime: &str, body: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(body))
}

// ==================== DTO fixtures ====================

pub fn news_dto(category: &str) -> CreateNewsDto {
    CreateNewsDto {
        title: Sentence(3..8).fake(),
        category: category.to_string(),
        content: Paragraph(2..4).fake(),
        img_url: None,
    }
}

pub fn document_dto(name: &str) -> CreateDocumentDto {
    CreateDocumentDto {
        name: name.to_string(),
        description: Sentence(4..10).fake(),
        author: "Water board".to_string(),
        availability_date: Utc::now(),
        document_url: document_payload("application/pdf", b"%PDF-1.4 test"),
    }
}

pub fn station_dto(name: &str) -> CreateStationDto {
    CreateStationDto {
        name: name.to_string(),
        lon: 2.35,
        lat: 48.85,
        charts_permitted: vec!["rainfall".to_string()],
    }
}

// ==================== News ====================

#[derive(Default)]
pub struct InMemoryNewsRepository {
    items: Mutex<Vec<News>>,
    fail_updates: AtomicBool,
}

impl InMemoryNewsRepository {
    /// Make every later `update` fail as if the database were down
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl NewsRepository for InMemoryNewsRepository {
    async fn insert(&self, news: &News) -> Result<News> {
        self.items.lock().unwrap().push(news.clone());
        Ok(news.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<News>> {
        Ok(self.items.lock().unwrap().iter().find(|n| n.id == id).cloned())
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<News>> {
        let mut items: Vec<News> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|n| category.is_none_or(|c| n.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: &NewsChanges) -> Result<Option<News>> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        let mut items = self.items.lock().unwrap();
        let Some(news) = items.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            news.title = title.clone();
        }
        if let Some(category) = &changes.category {
            news.category = category.clone();
        }
        if let Some(content) = &changes.content {
            news.content = content.clone();
        }
        if let Some(img_url) = &changes.img_url {
            news.img_url = Some(img_url.clone());
        }
        news.updated_at = changes.updated_at;
        Ok(Some(news.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|n| n.id != id);
        Ok(items.len() < before)
    }
}

/// Repository whose writes always fail, for cleanup paths
pub struct FailingNewsRepository;

#[async_trait]
impl NewsRepository for FailingNewsRepository {
    async fn insert(&self, _news: &News) -> Result<News> {
        Err(AppError::Internal("database unavailable".to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<News>> {
        Ok(None)
    }

    async fn list(&self, _category: Option<&str>) -> Result<Vec<News>> {
        Ok(Vec::new())
    }

    async fn update(&self, _id: Uuid, _changes: &NewsChanges) -> Result<Option<News>> {
        Err(AppError::Internal("database unavailable".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool> {
        Err(AppError::Internal("database unavailable".to_string()))
    }
}

// ==================== Documents ====================

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    items: Mutex<Vec<Document>>,
    fail_updates: AtomicBool,
}

impl InMemoryDocumentRepository {
    /// Make every later `update` fail as if the database were down
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<Document> {
        self.items.lock().unwrap().push(document.clone());
        Ok(document.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.items.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: &DocumentChanges) -> Result<Option<Document>> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        let mut items = self.items.lock().unwrap();
        let Some(document) = items.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            document.name = name.clone();
        }
        if let Some(description) = &changes.description {
            document.description = description.clone();
        }
        if let Some(author) = &changes.author {
            document.author = author.clone();
        }
        if let Some(availability_date) = changes.availability_date {
            document.availability_date = availability_date;
        }
        if let Some(document_url) = &changes.document_url {
            document.document_url = document_url.clone();
        }
        Ok(Some(document.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|d| d.id != id);
        Ok(items.len() < before)
    }
}

// ==================== Stations ====================

#[derive(Default)]
pub struct InMemoryStationRepository {
    items: Mutex<Vec<Station>>,
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn insert(&self, station: &Station) -> Result<Station> {
        self.items.lock().unwrap().push(station.clone());
        Ok(station.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Station>> {
        Ok(self.items.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Station>> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: &StationChanges) -> Result<Option<Station>> {
        let mut items = self.items.lock().unwrap();
        let Some(station) = items.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            station.name = name.clone();
        }
        if let Some(lon) = changes.lon {
            station.lon = lon;
        }
        if let Some(lat) = changes.lat {
            station.lat = lat;
        }
        if let Some(charts) = &changes.charts_permitted {
            station.charts_permitted = charts.clone();
        }
        Ok(Some(station.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|s| s.id != id);
        Ok(items.len() < before)
    }
}

// ==================== Users ====================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user.clone())
    }
}

pub async fn create_test_user(
    repo: &InMemoryUserRepository,
    username: &str,
    email: &str,
    password: &str,
) -> User {
    let user = User {
        id: Uuid::now_v7(),
        username: username.to_string(),
        email: email.to_string(),
        hashed_password: hash_password(password.to_string()).await.unwrap(),
        is_admin: false,
        created_at: Utc::now(),
    };
    repo.insert(&user).await.unwrap()
}
