use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::news::dtos::{CreateNewsDto, NewsResponseDto, UpdateNewsDto};
use crate::features::news::models::{News, NewsChanges};
use crate::features::news::repositories::NewsRepository;
use crate::modules::storage::{AttachmentKind, AttachmentManager};
use crate::shared::validation::parse_entity_id;

fn not_found() -> AppError {
    AppError::NotFound("News not found".to_string())
}

/// Service for news articles and their images
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    attachments: Arc<AttachmentManager>,
}

impl NewsService {
    pub fn new(repo: Arc<dyn NewsRepository>, attachments: Arc<AttachmentManager>) -> Self {
        Self { repo, attachments }
    }

    /// Create an article, storing its image under the new article's id
    pub async fn create(&self, dto: CreateNewsDto) -> Result<NewsResponseDto> {
        let id = Uuid::now_v7();

        let img_url = match dto.img_url.as_deref().filter(|s| !s.is_empty()) {
            Some(payload) => Some(
                self.attachments
                    .attach(payload, AttachmentKind::Image, id)
                    .await?,
            ),
            None => None,
        };

        let now = Utc::now();
        let news = News {
            id,
            title: dto.title,
            category: dto.category,
            content: dto.content,
            img_url,
            created_at: now,
            updated_at: now,
        };

        match self.repo.insert(&news).await {
            Ok(created) => {
                tracing::info!(
                    "News created: id={}, category={}, has_image={}",
                    created.id,
                    created.category,
                    created.img_url.is_some()
                );
                Ok(created.into())
            }
            Err(e) => {
                if let Some(img_url) = news.img_url.as_deref() {
                    self.attachments.discard(img_url).await;
                }
                Err(e)
            }
        }
    }

    /// List articles, newest first
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<NewsResponseDto>> {
        let items = self.repo.list(category).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> Result<NewsResponseDto> {
        let id = parse_entity_id(id, "news")?;
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(not_found)
    }

    /// Apply a partial update; a new image replaces and removes the previous one.
    ///
    /// An empty `img_url` keeps the current image and only refreshes `updated_at`.
    pub async fn update(&self, id: &str, dto: UpdateNewsDto) -> Result<NewsResponseDto> {
        let id = parse_entity_id(id, "news")?;
        let _guard = self.attachments.lock(id).await;

        let existing = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if dto.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let staged = match dto.image_payload() {
            Some(payload) => Some(
                self.attachments
                    .stage(payload, AttachmentKind::Image, id)
                    .await?,
            ),
            None => None,
        };

        let changes = NewsChanges {
            title: dto.title,
            category: dto.category,
            content: dto.content,
            img_url: staged.as_ref().map(|s| s.final_path().to_string()),
            updated_at: Utc::now(),
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
                updated = self.repoint_image(updated, committed).await;
            }
        }

        self.attachments
            .release_superseded(existing.img_url.as_deref(), updated.img_url.as_deref())
            .await;

        Ok(updated.into())
    }

    /// Point the record at the temporary image path left by a failed rename
    async fn repoint_image(&self, news: News, img_url: String) -> News {
        let changes = NewsChanges {
            title: None,
            category: None,
            content: None,
            img_url: Some(img_url),
            updated_at: news.updated_at,
        };

        match self.repo.update(news.id, &changes).await {
            Ok(Some(repointed)) => repointed,
            Ok(None) => news,
            Err(e) => {
                tracing::warn!("Could not repoint image of news {}: {}", news.id, e);
                news
            }
        }
    }

    /// Delete an article and its image file
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_entity_id(id, "news")?;
        let _guard = self.attachments.lock(id).await;

        let existing = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if !self.repo.delete(id).await? {
            return Err(not_found());
        }

        if let Some(img_url) = existing.img_url.as_deref() {
            self.attachments.discard(img_url).await;
        }

        tracing::info!("News deleted: id={}", id);
        Ok(())
    }
}
