use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::stations::dtos::{CreateStationDto, StationResponseDto, UpdateStationDto};
use crate::features::stations::models::{Station, StationChanges};
use crate::features::stations::repositories::StationRepository;
use crate::shared::validation::parse_entity_id;

fn not_found() -> AppError {
    AppError::NotFound("Station not found".to_string())
}

/// Service for monitoring stations. Writes are last-write-wins.
pub struct StationService {
    repo: Arc<dyn StationRepository>,
}

impl StationService {
    pub fn new(repo: Arc<dyn StationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, dto: CreateStationDto) -> Result<StationResponseDto> {
        let station = Station {
            id: Uuid::now_v7(),
            name: dto.name,
            lon: dto.lon,
            lat: dto.lat,
            charts_permitted: dto.charts_permitted,
            created_at: Utc::now(),
        };

        let created = self.repo.insert(&station).await?;
        tracing::info!("Station created: id={}, name={}", created.id, created.name);
        Ok(created.into())
    }

    pub async fn list(&self) -> Result<Vec<StationResponseDto>> {
        let items = self.repo.list().await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> Result<StationResponseDto> {
        let id = parse_entity_id(id, "station")?;
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: &str, dto: UpdateStationDto) -> Result<StationResponseDto> {
        let id = parse_entity_id(id, "station")?;

        if self.repo.find_by_id(id).await?.is_none() {
            return Err(not_found());
        }

        if dto.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let changes = StationChanges {
            name: dto.name,
            lon: dto.lon,
            lat: dto.lat,
            charts_permitted: dto.charts_permitted,
        };

        self.repo
            .update(id, &changes)
            .await?
            .map(Into::into)
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_entity_id(id, "station")?;

        if !self.repo.delete(id).await? {
            return Err(not_found());
        }

        tracing::info!("Station deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{station_dto, InMemoryStationRepository};

    fn create_test_service() -> StationService {
        StationService::new(Arc::new(InMemoryStationRepository::default()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = create_test_service();

        let created = service.create(station_dto("North ridge")).await.unwrap();
        let fetched = service.get(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.name, "North ridge");
        assert_eq!(fetched.charts_permitted, vec!["rainfall"]);
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let service = create_test_service();
        service.create(station_dto("South basin")).await.unwrap();
        service.create(station_dto("East pier")).await.unwrap();

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["East pier", "South basin"]);
    }

    #[tokio::test]
    async fn test_update_only_touches_present_fields() {
        let service = create_test_service();
        let created = service.create(station_dto("North ridge")).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                UpdateStationDto {
                    lat: Some(-12.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.lat, -12.5);
        assert_eq!(updated.lon, created.lon);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.charts_permitted, created.charts_permitted);
    }

    #[tokio::test]
    async fn test_update_with_malformed_id_is_invalid_argument() {
        let service = create_test_service();

        let err = service
            .update(
                "badId",
                UpdateStationDto {
                    name: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_station_is_not_found() {
        let service = create_test_service();
        let created = service.create(station_dto("North ridge")).await.unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(
            service.delete(&id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
