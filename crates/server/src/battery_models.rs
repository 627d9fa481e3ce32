//! Battery model API endpoints

use api_types::{
    Created,
    battery_model::{BatteryModelListResponse, BatteryModelUpsert, BatteryModelView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user::AuthUser};

fn view(battery_model: engine::BatteryModel) -> BatteryModelView {
    BatteryModelView {
        id: battery_model.id,
        description: battery_model.description,
    }
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<BatteryModelListResponse>, ServerError> {
    let battery_models = state
        .engine
        .list_battery_models(user.username())
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(BatteryModelListResponse { battery_models }))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BatteryModelView>, ServerError> {
    let battery_model = state.engine.battery_model(user.username(), id).await?;
    Ok(Json(view(battery_model)))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BatteryModelUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_battery_model(user.username(), &payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<BatteryModelUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_battery_model(user.username(), id, &payload.description)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_battery_model(user.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
