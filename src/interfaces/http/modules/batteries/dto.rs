//! Battery DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Battery, BatteryChanges};

/// Battery as stored
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatteryResponse {
    pub id: String,
    /// Charge level in percent
    pub level: f64,
    pub is_charging: bool,
    /// Percent gained per tick while charging
    pub charging_speed: f64,
}

impl From<Battery> for BatteryResponse {
    fn from(b: Battery) -> Self {
        Self {
            id: b.id,
            level: b.level,
            is_charging: b.is_charging,
            charging_speed: b.charging_speed,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBatteryRequest {
    #[validate(length(min = 1, max = 50, message = "id must be 1 to 50 characters"))]
    pub id: String,
    pub level: f64,
    pub charging_speed: f64,
    /// Defaults to `false`
    pub is_charging: Option<bool>,
}

impl From<CreateBatteryRequest> for Battery {
    fn from(req: CreateBatteryRequest) -> Self {
        let mut battery = Battery::new(req.id, req.level, req.charging_speed);
        battery.is_charging = req.is_charging.unwrap_or(false);
        battery
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBatteryRequest {
    pub level: Option<f64>,
    pub is_charging: Option<bool>,
    pub charging_speed: Option<f64>,
}

impl From<UpdateBatteryRequest> for BatteryChanges {
    fn from(req: UpdateBatteryRequest) -> Self {
        Self {
            level: req.level,
            is_charging: req.is_charging,
            charging_speed: req.charging_speed,
        }
    }
}
