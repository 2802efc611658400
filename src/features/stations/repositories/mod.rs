mod station_repository;

pub use station_repository::{PgStationRepository, StationRepository};
