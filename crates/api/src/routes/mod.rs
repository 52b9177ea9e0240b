pub mod health;
pub mod ticket;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthcheck                                     service + database health
///
/// /tickets                                         list, create
/// /tickets/{id}                                    get, update (PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/tickets", ticket::router())
}
