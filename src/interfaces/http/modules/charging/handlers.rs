//! Charge control handlers
//!
//! Thin adapters over `ChargeController`; the conditional permit update
//! decides every outcome, these only pick the status and message.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::{ChargeController, StartOutcome, StopOutcome};
use crate::interfaces::http::common::{domain_error, ApiResult, MessageResponse};

#[derive(Clone)]
pub struct ChargingState {
    pub controller: Arc<ChargeController>,
}

#[utoipa::path(
    post,
    path = "/charge/{id}",
    tag = "Charging",
    params(("id" = String, Path, description = "Battery ID")),
    responses(
        (status = 201, description = "Charging started", body = MessageResponse),
        (status = 200, description = "Already charging", body = MessageResponse),
        (status = 404, description = "Battery not found", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn start_charging(
    State(state): State<ChargingState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    match state.controller.start(&id).await {
        Ok(StartOutcome::Started) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Charging started.")),
        )),
        Ok(StartOutcome::AlreadyCharging) => Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Charging already in progress.")),
        )),
        Err(e) => Err(domain_error(e, "Error starting charging.")),
    }
}

#[utoipa::path(
    delete,
    path = "/charge/{id}",
    tag = "Charging",
    params(("id" = String, Path, description = "Battery ID")),
    responses(
        (status = 200, description = "Stopped, or was not charging", body = MessageResponse),
        (status = 404, description = "Battery not found", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn stop_charging(
    State(state): State<ChargingState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    match state.controller.stop(&id).await {
        Ok(StopOutcome::Stopped) => Ok(Json(MessageResponse::new("Charging stopped."))),
        Ok(StopOutcome::NotCharging) => {
            Ok(Json(MessageResponse::new("Bike is not currently charging.")))
        }
        Err(e) => Err(domain_error(e, "Error stopping charging.")),
    }
}
