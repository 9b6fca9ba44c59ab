//! Domain layer: entities and repository interfaces

pub mod battery;
pub mod repositories;
pub mod station;

pub use battery::{Battery, BatteryChanges, BatteryRepository, ChargeBounds};
pub use repositories::{DomainResult, RepositoryProvider};
pub use station::{ChargingStation, StationRepository};

pub use crate::shared::errors::DomainError;
