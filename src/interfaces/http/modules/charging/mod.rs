//! Charging module: start/stop control

pub mod handlers;

pub use handlers::*;
