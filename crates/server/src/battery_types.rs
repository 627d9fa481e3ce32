//! Battery type API endpoints

use api_types::{
    Created,
    battery_type::{BatteryTypeListResponse, BatteryTypeUpsert, BatteryTypeView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user::AuthUser};

fn view(battery_type: engine::BatteryType) -> BatteryTypeView {
    BatteryTypeView {
        id: battery_type.id,
        code: battery_type.code,
        description: battery_type.description,
    }
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<BatteryTypeListResponse>, ServerError> {
    let battery_types = state
        .engine
        .list_battery_types(user.username())
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(BatteryTypeListResponse { battery_types }))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BatteryTypeView>, ServerError> {
    let battery_type = state.engine.battery_type(user.username(), id).await?;
    Ok(Json(view(battery_type)))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BatteryTypeUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_battery_type(
            user.username(),
            &payload.code,
            payload.description.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<BatteryTypeUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_battery_type(
            user.username(),
            id,
            &payload.code,
            payload.description.as_deref(),
        )
        .await?;
    Ok(StatusCode::OK)
}

/// Deleting a battery type also deletes its devices and their assignments.
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_battery_type(user.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
