//! Database entities module

pub mod battery;
pub mod station;

pub use battery::Entity as Battery;
pub use station::Entity as Station;
