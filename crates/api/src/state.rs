use std::sync::Arc;

use axum::extract::FromRef;
use tixer_db::repositories::TicketRepo;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::extract::BodyLimit;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tixer_db::DbPool,
    /// Ticket persistence, sharing `pool`.
    pub tickets: TicketRepo,
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Root cancellation scope. Each request derives a child token from it;
    /// cancelling it aborts every in-flight store call.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pool: tixer_db::DbPool, config: AppConfig) -> Self {
        let tickets = TicketRepo::new(pool.clone(), config.database.query_timeout);
        Self {
            pool,
            tickets,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }
}

impl FromRef<AppState> for BodyLimit {
    fn from_ref(state: &AppState) -> Self {
        BodyLimit(state.config.server.max_body_bytes)
    }
}
