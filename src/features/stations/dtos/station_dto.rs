use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::stations::models::Station;

/// Request DTO for registering a station
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStationDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Longitude in decimal degrees
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,

    /// Latitude in decimal degrees
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    /// Chart identifiers this station may feed
    #[serde(default, alias = "charts_permited")]
    pub charts_permitted: Vec<String>,
}

/// Request DTO for updating a station. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStationDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[serde(alias = "charts_permited")]
    pub charts_permitted: Option<Vec<String>>,
}

impl UpdateStationDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.lon.is_none()
            && self.lat.is_none()
            && self.charts_permitted.is_none()
    }
}

/// Response DTO for a station
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StationResponseDto {
    pub id: Uuid,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub charts_permitted: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Station> for StationResponseDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            lon: s.lon,
            lat: s.lat,
            charts_permitted: s.charts_permitted,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_ranges() {
        let valid = CreateStationDto {
            name: "North ridge".to_string(),
            lon: -180.0,
            lat: 90.0,
            charts_permitted: vec![],
        };
        assert!(valid.validate().is_ok());

        let bad_lon = CreateStationDto {
            lon: 180.5,
            ..valid.clone()
        };
        assert!(bad_lon.validate().is_err());

        let bad_lat = UpdateStationDto {
            lat: Some(-91.0),
            ..Default::default()
        };
        assert!(bad_lat.validate().is_err());
    }

    #[test]
    fn test_misspelled_charts_field_is_accepted() {
        let dto: CreateStationDto = serde_json::from_value(json!({
            "name": "North ridge",
            "lon": 2.35,
            "lat": 48.85,
            "charts_permited": ["rainfall", "temperature"]
        }))
        .unwrap();

        assert_eq!(dto.charts_permitted, vec!["rainfall", "temperature"]);
    }
}
