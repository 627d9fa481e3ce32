//! Assignment API endpoints
//!
//! Writes are checked against the device's remaining capacity; a rejected
//! quantity comes back as 422 with `"field": "quantity"`.

use api_types::{
    Created,
    assignment::{AssignmentListQuery, AssignmentListResponse, AssignmentUpsert, AssignmentView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use engine::{AssignmentFilter, AssignmentInput};

use crate::{ServerError, server::ServerState, user::AuthUser};

fn view(assignment: engine::Assignment) -> AssignmentView {
    let label = assignment.to_string();
    AssignmentView {
        id: assignment.id,
        device_id: assignment.device_id,
        device: assignment.device,
        battery_model_id: assignment.battery_model_id,
        battery_model: assignment.battery_model,
        quantity: assignment.quantity,
        label,
    }
}

fn input(payload: AssignmentUpsert) -> AssignmentInput {
    AssignmentInput {
        device_id: payload.device_id,
        battery_model_id: payload.battery_model_id,
        quantity: payload.quantity,
    }
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<AssignmentListQuery>, QueryRejection>,
) -> Result<Json<AssignmentListResponse>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    let filter = AssignmentFilter {
        battery_type: query.battery_type,
        battery_model: query.battery_model,
    };
    let listed = state
        .engine
        .list_assignments(user.username(), filter)
        .await?;

    Ok(Json(AssignmentListResponse {
        assignments: listed.assignments.into_iter().map(view).collect(),
        battery_total: listed.battery_total,
    }))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<AssignmentView>, ServerError> {
    let assignment = state.engine.assignment(user.username(), id).await?;
    Ok(Json(view(assignment)))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<AssignmentUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_assignment(user.username(), input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<AssignmentUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_assignment(user.username(), id, input(payload))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_assignment(user.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
