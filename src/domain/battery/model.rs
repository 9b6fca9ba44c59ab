//! Battery domain entity

use crate::domain::DomainError;

/// Lower and upper bound of a battery's charge level, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeBounds {
    /// Lowest level a client may store
    pub floor: f64,
    /// Level at which charging terminates
    pub full_mark: f64,
}

impl ChargeBounds {
    pub fn new(floor: f64, full_mark: f64) -> Self {
        Self { floor, full_mark }
    }

    pub fn contains(&self, level: f64) -> bool {
        level.is_finite() && level >= self.floor && level <= self.full_mark
    }

    pub fn is_full(&self, level: f64) -> bool {
        level >= self.full_mark
    }
}

impl Default for ChargeBounds {
    fn default() -> Self {
        Self {
            floor: 0.0,
            full_mark: 100.0,
        }
    }
}

/// Bike battery
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Short opaque identifier, unique
    pub id: String,
    /// Charge level in percent
    pub level: f64,
    /// Charging permit: an activity may only raise `level` while this is set
    pub is_charging: bool,
    /// Percent gained per tick
    pub charging_speed: f64,
}

impl Battery {
    pub fn new(id: impl Into<String>, level: f64, charging_speed: f64) -> Self {
        Self {
            id: id.into(),
            level,
            is_charging: false,
            charging_speed,
        }
    }

    /// Check the values a client wants to store.
    ///
    /// Stored rows are never repaired; this only guards writes coming
    /// through the CRUD surface.
    pub fn validate(&self, bounds: &ChargeBounds) -> Result<(), DomainError> {
        check_level(self.level, bounds)?;
        check_speed(self.charging_speed)
    }
}

/// Column-level changes requested through the CRUD surface.
///
/// Only the fields that are `Some` are written, so a partial update never
/// overwrites a permit or level that changed since the client last read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryChanges {
    pub level: Option<f64>,
    pub is_charging: Option<bool>,
    pub charging_speed: Option<f64>,
}

impl BatteryChanges {
    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.is_charging.is_none() && self.charging_speed.is_none()
    }

    pub fn validate(&self, bounds: &ChargeBounds) -> Result<(), DomainError> {
        if let Some(level) = self.level {
            check_level(level, bounds)?;
        }
        if let Some(speed) = self.charging_speed {
            check_speed(speed)?;
        }
        Ok(())
    }
}

fn check_level(level: f64, bounds: &ChargeBounds) -> Result<(), DomainError> {
    if bounds.contains(level) {
        return Ok(());
    }
    Err(DomainError::Validation(format!(
        "level must be between {} and {}, got {}",
        bounds.floor, bounds.full_mark, level
    )))
}

fn check_speed(speed: f64) -> Result<(), DomainError> {
    if speed.is_finite() && speed > 0.0 {
        return Ok(());
    }
    Err(DomainError::Validation(format!(
        "charging_speed must be a positive number, got {}",
        speed
    )))
}
