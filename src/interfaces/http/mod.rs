//! HTTP REST API
//!
//! - `common`: message body, error mapping, validated JSON extractor
//! - `modules`: handlers and DTOs per resource, request-id and metrics middleware
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
