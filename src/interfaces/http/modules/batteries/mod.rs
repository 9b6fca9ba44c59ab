//! Batteries module: CRUD over battery records

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
