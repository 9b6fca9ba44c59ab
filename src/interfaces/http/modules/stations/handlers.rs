//! Charging station REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::StationResponse;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{api_error, domain_error, ApiResult, MessageResponse};

#[derive(Clone)]
pub struct StationState {
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    get,
    path = "/charging-stations",
    tag = "Charging Stations",
    responses(
        (status = 200, description = "All stations", body = Vec<StationResponse>),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn list_stations(
    State(state): State<StationState>,
) -> ApiResult<Json<Vec<StationResponse>>> {
    let stations = state
        .repos
        .stations()
        .find_all()
        .await
        .map_err(|e| domain_error(e, "Error listing charging stations."))?;

    Ok(Json(stations.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/charging-stations/{id}",
    tag = "Charging Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station", body = StationResponse),
        (status = 400, description = "Id is not an integer", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn get_station(
    State(state): State<StationState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<StationResponse>> {
    let id: i32 = raw_id
        .parse()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Invalid ID"))?;

    match state.repos.stations().find_by_id(id).await {
        Ok(Some(station)) => Ok(Json(station.into())),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Charging station not found")),
        Err(e) => Err(domain_error(e, "Error reading charging station.")),
    }
}
