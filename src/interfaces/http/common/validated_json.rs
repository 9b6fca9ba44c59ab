//! JSON body extractor that also runs `validator` rules.
//!
//! Malformed or mistyped bodies are rejected with 400; bodies that parse
//! but break a `#[validate(...)]` rule are rejected with 422. Both carry
//! the usual `{"message": ...}` body.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::{api_error, ApiError};

/// `Json<T>` plus `T::validate()`.
///
/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreateBatteryRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", rejection))
            })?;

        value.validate().map_err(|errors| {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, describe(&errors))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// One `field: reason` entry per failed rule, fields in name order.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: failed {}", field, e.code),
            })
        })
        .collect();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}
