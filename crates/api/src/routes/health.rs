use axum::extract::State;
use axum::{routing::get, Router};
use serde::Serialize;

use crate::response::JsonResponse;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `available`, or `degraded` when the database check fails.
    pub status: &'static str,
    pub system_info: SystemInfo,
    /// `ok` or `unreachable`.
    pub database: &'static str,
}

#[derive(Serialize)]
pub struct SystemInfo {
    pub environment: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /v1/healthcheck -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> JsonResponse<HealthResponse> {
    let check = tokio::time::timeout(
        state.tickets.query_timeout(),
        tixer_db::health_check(&state.pool),
    )
    .await;
    let db_healthy = matches!(check, Ok(Ok(())));

    if !db_healthy {
        tracing::warn!("Database health check failed");
    }

    JsonResponse::ok(HealthResponse {
        status: if db_healthy { "available" } else { "degraded" },
        system_info: SystemInfo {
            environment: state.config.environment.as_str(),
            version: env!("CARGO_PKG_VERSION"),
        },
        database: if db_healthy { "ok" } else { "unreachable" },
    })
}

/// Mount the health check route, nested under `/v1` with the API.
pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health_check))
}
