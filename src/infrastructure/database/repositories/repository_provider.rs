//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::battery::BatteryRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::station::StationRepository;

use super::battery_repository::SeaOrmBatteryRepository;
use super::station_repository::SeaOrmStationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool shared by request handlers and charging
/// activities, and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    batteries: SeaOrmBatteryRepository,
    stations: SeaOrmStationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            batteries: SeaOrmBatteryRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn batteries(&self) -> &dyn BatteryRepository {
        &self.batteries
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }
}
