//! Charging station domain entity

/// A station where batteries can be swapped or charged.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingStation {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Aggregate charge level advertised by the station, in percent
    pub battery_level: i32,
}
