//! Common HTTP types: the message body and domain error mapping

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Body of every status and error reply: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<MessageResponse>);

pub type ApiResult<T> = Result<T, ApiError>;

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(MessageResponse::new(message)))
}

/// Map a domain error to its HTTP status. Store failures are logged and
/// replaced with `store_message` so driver details never reach the client.
pub fn domain_error(err: DomainError, store_message: &str) -> ApiError {
    match err {
        DomainError::NotFound { entity, .. } => api_error(
            StatusCode::NOT_FOUND,
            format!("{} not found", entity.to_lowercase()),
        ),
        DomainError::Validation(msg) => api_error(StatusCode::UNPROCESSABLE_ENTITY, msg),
        DomainError::Conflict(msg) => api_error(StatusCode::CONFLICT, msg),
        DomainError::Store(detail) => {
            error!(error = %detail, "{}", store_message);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, store_message)
        }
    }
}
