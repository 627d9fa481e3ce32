//! Device API endpoints

use api_types::{
    Created,
    device::{DeviceListQuery, DeviceListResponse, DeviceUpsert, DeviceView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use engine::{DeviceFilter, DeviceInput};

use crate::{ServerError, server::ServerState, user::AuthUser};

fn view(device: engine::Device) -> DeviceView {
    let label = device.to_string();
    DeviceView {
        id: device.id,
        description: device.description,
        battery_type_id: device.battery_type_id,
        battery_type: device.battery_type,
        capacity: device.capacity,
        label,
    }
}

fn input(payload: DeviceUpsert) -> DeviceInput {
    DeviceInput {
        description: payload.description,
        battery_type_id: payload.battery_type_id,
        capacity: payload.capacity,
    }
}

/// Handle requests for listing devices, optionally of one battery type
pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<DeviceListQuery>, QueryRejection>,
) -> Result<Json<DeviceListResponse>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    let filter = DeviceFilter {
        battery_type: query.battery_type,
    };
    let listed = state.engine.list_devices(user.username(), filter).await?;

    Ok(Json(DeviceListResponse {
        devices: listed.devices.into_iter().map(view).collect(),
        battery_total: listed.battery_total,
    }))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<DeviceView>, ServerError> {
    let device = state.engine.device(user.username(), id).await?;
    Ok(Json(view(device)))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<DeviceUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_device(user.username(), input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<DeviceUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_device(user.username(), id, input(payload))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_device(user.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
