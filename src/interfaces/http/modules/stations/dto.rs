//! Charging station DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ChargingStation;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StationResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub battery_level: i32,
}

impl From<ChargingStation> for StationResponse {
    fn from(s: ChargingStation) -> Self {
        Self {
            id: s.id,
            name: s.name,
            address: s.address,
            latitude: s.latitude,
            longitude: s.longitude,
            battery_level: s.battery_level,
        }
    }
}
