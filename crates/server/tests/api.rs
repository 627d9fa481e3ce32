use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();
    engine.create_account("alice", "password").await.unwrap();
    engine.create_account("bob", "hunter2").await.unwrap();
    server::router(engine)
}

fn basic(username: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {token}")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    send_as(app, ("alice", "password"), method, uri, body).await
}

async fn send_as(
    app: &Router,
    (username, password): (&str, &str),
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(username, password));
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a device of the seeded "AA" type and returns its id with the
/// seeded "Non-Rechargeable" model id.
async fn remote_with_capacity(app: &Router, capacity: i32) -> (i64, i64) {
    let types = body_json(send(app, Method::GET, "/battery/types", None).await).await;
    let models = body_json(send(app, Method::GET, "/battery/models", None).await).await;
    let aa = types["battery_types"][0]["id"].as_i64().unwrap();
    let model = models["battery_models"][0]["id"].as_i64().unwrap();

    let response = send(
        app,
        Method::POST,
        "/battery/devices",
        Some(json!({ "description": "Remote", "battery_type_id": aa, "capacity": capacity })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let device = body_json(response).await["id"].as_i64().unwrap();
    (device, model)
}

#[tokio::test]
async fn missing_credentials_are_unauthorized() {
    let app = app().await;
    let request = Request::builder()
        .uri("/battery/types")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_as(&app, ("alice", "nope"), Method::GET, "/battery/types", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_is_closed() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/accounts/signup")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "signup is closed");
}

#[tokio::test]
async fn seeded_rows_are_listed() {
    let app = app().await;
    let types = body_json(send(&app, Method::GET, "/battery/types", None).await).await;
    assert_eq!(types["battery_types"][0]["code"], "AA");
    assert_eq!(types["battery_types"][1]["code"], "AAA");

    let models = body_json(send(&app, Method::GET, "/battery/models", None).await).await;
    assert_eq!(models["battery_models"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn over_allocation_is_a_field_error() {
    let app = app().await;
    let (device, model) = remote_with_capacity(&app, 4).await;

    let response = send(
        &app,
        Method::POST,
        "/battery/assignments",
        Some(json!({ "device_id": device, "battery_model_id": model, "quantity": 3 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        Method::POST,
        "/battery/assignments",
        Some(json!({ "device_id": device, "battery_model_id": model, "quantity": 2 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["field"], "quantity");
    assert_eq!(
        body["error"],
        "No more than 1 battery can be assigned to this device."
    );
}

#[tokio::test]
async fn assignment_crud_round() {
    let app = app().await;
    let (device, model) = remote_with_capacity(&app, 4).await;

    let response = send(
        &app,
        Method::POST,
        "/battery/assignments",
        Some(json!({ "device_id": device, "battery_model_id": model, "quantity": 2 })),
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let uri = format!("/battery/assignments/{id}");
    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "device_id": device, "battery_model_id": model, "quantity": 4 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = body_json(send(&app, Method::GET, &uri, None).await).await;
    assert_eq!(stored["quantity"], 4);
    assert_eq!(stored["label"], "Remote (4x AA) (4x Non-Rechargeable)");

    let listed = body_json(send(&app, Method::GET, "/battery/assignments", None).await).await;
    assert_eq!(listed["battery_total"], 4);

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn device_list_filters_by_battery_type() {
    let app = app().await;
    let (device, _) = remote_with_capacity(&app, 3).await;
    let stored = body_json(send(&app, Method::GET, &format!("/battery/devices/{device}"), None).await).await;
    let aa = stored["battery_type_id"].as_i64().unwrap();

    let all = body_json(send(&app, Method::GET, "/battery/devices?battery_type=0", None).await).await;
    assert_eq!(all["battery_total"], 3);
    assert_eq!(all["devices"][0]["label"], "Remote (3x AA)");

    let other = aa + 1;
    let filtered = body_json(
        send(&app, Method::GET, &format!("/battery/devices?battery_type={other}"), None).await,
    )
    .await;
    assert!(filtered["devices"].as_array().unwrap().is_empty());
    assert_eq!(filtered["battery_total"], 0);
}

#[tokio::test]
async fn other_owners_rows_are_not_found() {
    let app = app().await;
    let (device, _) = remote_with_capacity(&app, 2).await;

    let uri = format!("/battery/devices/{device}");
    let response = send_as(&app, ("bob", "hunter2"), Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send_as(&app, ("bob", "hunter2"), Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_capacity_is_a_field_error() {
    let app = app().await;
    let types = body_json(send(&app, Method::GET, "/battery/types", None).await).await;
    let aa = types["battery_types"][0]["id"].as_i64().unwrap();

    let response = send(
        &app,
        Method::POST,
        "/battery/devices",
        Some(json!({ "description": "Lamp", "battery_type_id": aa, "capacity": 11 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["field"], "capacity");
}

#[tokio::test]
async fn battery_type_delete_cascades() {
    let app = app().await;
    let response = send(
        &app,
        Method::POST,
        "/battery/types",
        Some(json!({ "code": "9V" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(
        &app,
        Method::POST,
        "/battery/devices",
        Some(json!({ "description": "Smoke alarm", "battery_type_id": id, "capacity": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, Method::DELETE, &format!("/battery/types/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let devices = body_json(send(&app, Method::GET, "/battery/devices", None).await).await;
    assert!(devices["devices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_filters_mean_no_filter() {
    let app = app().await;
    remote_with_capacity(&app, 2).await;

    let response = send(&app, Method::GET, "/battery/devices?battery_type=", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["battery_total"], 2);

    let response = send(
        &app,
        Method::GET,
        "/battery/assignments?battery_type=&battery_model=",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_filter_is_a_json_error() {
    let app = app().await;
    let response = send(&app, Method::GET, "/battery/devices?battery_type=AA", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}
