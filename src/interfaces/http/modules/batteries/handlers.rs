//! Battery REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use super::dto::{BatteryResponse, CreateBatteryRequest, UpdateBatteryRequest};
use crate::domain::{Battery, BatteryChanges, ChargeBounds, DomainError, RepositoryProvider};
use crate::interfaces::http::common::{domain_error, ApiResult, MessageResponse, ValidatedJson};

#[derive(Clone)]
pub struct BatteryState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub bounds: ChargeBounds,
}

#[utoipa::path(
    get,
    path = "/batteries",
    tag = "Batteries",
    responses(
        (status = 200, description = "All batteries", body = Vec<BatteryResponse>),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn list_batteries(
    State(state): State<BatteryState>,
) -> ApiResult<Json<Vec<BatteryResponse>>> {
    let batteries = state
        .repos
        .batteries()
        .find_all()
        .await
        .map_err(|e| domain_error(e, "Error listing batteries."))?;

    Ok(Json(batteries.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/battery/{id}",
    tag = "Batteries",
    params(("id" = String, Path, description = "Battery ID")),
    responses(
        (status = 200, description = "Battery", body = BatteryResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn get_battery(
    State(state): State<BatteryState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BatteryResponse>> {
    match state.repos.batteries().find_by_id(&id).await {
        Ok(Some(battery)) => Ok(Json(battery.into())),
        Ok(None) => Err(domain_error(DomainError::battery_not_found(&id), "")),
        Err(e) => Err(domain_error(e, "Error reading battery.")),
    }
}

#[utoipa::path(
    post,
    path = "/battery",
    tag = "Batteries",
    request_body = CreateBatteryRequest,
    responses(
        (status = 201, description = "Created", body = BatteryResponse),
        (status = 400, description = "Malformed JSON", body = MessageResponse),
        (status = 409, description = "Id already taken", body = MessageResponse),
        (status = 422, description = "Invalid values", body = MessageResponse)
    )
)]
pub async fn create_battery(
    State(state): State<BatteryState>,
    ValidatedJson(req): ValidatedJson<CreateBatteryRequest>,
) -> ApiResult<(StatusCode, Json<BatteryResponse>)> {
    let battery = Battery::from(req);
    battery
        .validate(&state.bounds)
        .map_err(|e| domain_error(e, ""))?;

    let saved = state
        .repos
        .batteries()
        .insert(battery)
        .await
        .map_err(|e| domain_error(e, "Error inserting battery."))?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[utoipa::path(
    put,
    path = "/battery/{id}",
    tag = "Batteries",
    params(("id" = String, Path, description = "Battery ID")),
    request_body = UpdateBatteryRequest,
    responses(
        (status = 200, description = "Updated", body = BatteryResponse),
        (status = 404, description = "Not found", body = MessageResponse),
        (status = 422, description = "Invalid values", body = MessageResponse)
    )
)]
pub async fn update_battery(
    State(state): State<BatteryState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBatteryRequest>,
) -> ApiResult<Json<BatteryResponse>> {
    let changes = BatteryChanges::from(req);
    changes
        .validate(&state.bounds)
        .map_err(|e| domain_error(e, ""))?;

    if changes.is_charging == Some(true) {
        // Raising the flag here admits no activity; only POST /charge does.
        warn!(battery_id = %id, "is_charging set through CRUD update");
    }

    let updated = state
        .repos
        .batteries()
        .update(&id, changes)
        .await
        .map_err(|e| domain_error(e, "Error updating battery."))?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/battery/{id}",
    tag = "Batteries",
    params(("id" = String, Path, description = "Battery ID")),
    responses(
        (status = 200, description = "Deleted battery", body = BatteryResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn delete_battery(
    State(state): State<BatteryState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BatteryResponse>> {
    let batteries = state.repos.batteries();

    let battery = batteries
        .find_by_id(&id)
        .await
        .map_err(|e| domain_error(e, "Error deleting battery."))?
        .ok_or_else(|| domain_error(DomainError::battery_not_found(&id), ""))?;

    batteries
        .delete(&id)
        .await
        .map_err(|e| domain_error(e, "Error deleting battery."))?;

    Ok(Json(battery.into()))
}
