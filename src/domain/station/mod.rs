//! Charging station aggregate (read-only catalog)

pub mod model;
pub mod repository;

pub use model::ChargingStation;
pub use repository::StationRepository;
