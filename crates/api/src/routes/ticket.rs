//! Route definitions for tickets.

use axum::routing::get;
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Ticket routes mounted at `/tickets`.
///
/// ```text
/// GET    /       -> list_tickets
/// POST   /       -> create_ticket
/// GET    /{id}   -> get_ticket
/// PATCH  /{id}   -> update_ticket
/// DELETE /{id}   -> delete_ticket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ticket::list_tickets).post(ticket::create_ticket))
        .route(
            "/{id}",
            get(ticket::get_ticket)
                .patch(ticket::update_ticket)
                .delete(ticket::delete_ticket),
        )
}
