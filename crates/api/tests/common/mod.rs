#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tixer_api::config::{AppConfig, DatabaseConfig, Environment, ServerConfig};
use tixer_api::router::build_app_router;
use tixer_api::state::AppState;
use tixer_db::DbConfig;

/// Body limit used by the test app; small enough to exceed cheaply.
pub const TEST_BODY_LIMIT: usize = 4096;

/// Build a test `AppConfig` with safe defaults.
///
/// The database section is unused by the router itself; the pool handed to
/// [`build_test_app`] comes from `#[sqlx::test]`.
pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 1,
            max_body_bytes: TEST_BODY_LIMIT,
        },
        database: DatabaseConfig {
            pool: DbConfig {
                url: String::new(),
                max_connections: 5,
                min_connections: 0,
                max_idle_time: Duration::from_secs(60),
            },
            query_timeout: Duration::from_secs(5),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let server = config.server.clone();
    let state = AppState::new(pool, config);
    build_app_router(state, &server).expect("test config builds a router")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send_raw(app, Method::POST, uri, json.to_string()).await
}

pub async fn patch_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send_raw(app, Method::PATCH, uri, json.to_string()).await
}

/// Send an arbitrary body verbatim, for malformed-input tests.
pub async fn send_raw(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// Create a ticket and return its `ticket` object.
pub async fn create_ticket(pool: &PgPool, title: &str, price: i64) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/v1/tickets",
        serde_json::json!({"title": title, "price": price}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["ticket"].clone()
}
