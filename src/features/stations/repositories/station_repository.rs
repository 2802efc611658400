use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::stations::models::{Station, StationChanges};

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn insert(&self, station: &Station) -> Result<Station>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Station>>;

    /// All stations ordered by name
    async fn list(&self) -> Result<Vec<Station>>;

    async fn update(&self, id: Uuid, changes: &StationChanges) -> Result<Option<Station>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct PgStationRepository {
    pool: PgPool,
}

impl PgStationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationRepository for PgStationRepository {
    async fn insert(&self, station: &Station) -> Result<Station> {
        sqlx::query_as::<_, Station>(
            r#"
            INSERT INTO stations (id, name, lon, lat, charts_permitted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, lon, lat, charts_permitted, created_at
            "#,
        )
        .bind(station.id)
        .bind(&station.name)
        .bind(station.lon)
        .bind(station.lat)
        .bind(&station.charts_permitted)
        .bind(station.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert station: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Station>> {
        sqlx::query_as::<_, Station>(
            r#"
            SELECT id, name, lon, lat, charts_permitted, created_at
            FROM stations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Station>> {
        sqlx::query_as::<_, Station>(
            r#"
            SELECT id, name, lon, lat, charts_permitted, created_at
            FROM stations
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, id: Uuid, changes: &StationChanges) -> Result<Option<Station>> {
        sqlx::query_as::<_, Station>(
            r#"
            UPDATE stations
            SET name = COALESCE($2, name),
                lon = COALESCE($3, lon),
                lat = COALESCE($4, lat),
                charts_permitted = COALESCE($5, charts_permitted)
            WHERE id = $1
            RETURNING id, name, lon, lat, charts_permitted, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(changes.lon)
        .bind(changes.lat)
        .bind(&changes.charts_permitted)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update station {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
