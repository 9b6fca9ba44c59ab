//! Battery aggregate
//!
//! Contains the Battery entity, the level bounds used at the CRUD boundary,
//! and the repository that doubles as the charging permit store.

pub mod model;
pub mod repository;

pub use model::{Battery, BatteryChanges, ChargeBounds};
pub use repository::BatteryRepository;
