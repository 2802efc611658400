use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a weather or monitoring station
#[derive(Debug, Clone, FromRow)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub charts_permitted: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StationChanges {
    pub name: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub charts_permitted: Option<Vec<String>>,
}
