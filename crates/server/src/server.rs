use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{assignments, battery_models, battery_types, devices, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
        .map_err(|err| {
            tracing::error!("authentication failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user::AuthUser(user));
    Ok(next.run(request).await)
}

/// Builds the HTTP router over `engine`.
///
/// Everything but the signup endpoint sits behind Basic authentication.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route(
            "/battery/types",
            get(battery_types::list).post(battery_types::create),
        )
        .route(
            "/battery/types/{id}",
            get(battery_types::get)
                .put(battery_types::update)
                .delete(battery_types::delete),
        )
        .route(
            "/battery/models",
            get(battery_models::list).post(battery_models::create),
        )
        .route(
            "/battery/models/{id}",
            get(battery_models::get)
                .put(battery_models::update)
                .delete(battery_models::delete),
        )
        .route("/battery/devices", get(devices::list).post(devices::create))
        .route(
            "/battery/devices/{id}",
            get(devices::get).put(devices::update).delete(devices::delete),
        )
        .route(
            "/battery/assignments",
            get(assignments::list).post(assignments::create),
        )
        .route(
            "/battery/assignments/{id}",
            get(assignments::get)
                .put(assignments::update)
                .delete(assignments::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/accounts/signup", post(user::signup))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
