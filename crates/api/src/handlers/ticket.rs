//! Handlers for the `/v1/tickets` resource.
//!
//! Every store call runs under the request's [`RequestScope`] token, so a
//! disconnected client or a forced shutdown aborts the query in flight.

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tixer_core::error::CoreError;
use tixer_core::pagination::{Pagination, Paginator};
use tixer_core::public_id::PublicId;
use tixer_core::sort::Sorter;
use tixer_core::ticket::{validate_list_query, validate_ticket, SORT_SAFELIST};
use tixer_core::validation::{QueryValues, Validator};
use tixer_db::models::ticket::{NewTicket, Ticket, TicketFilter};

use crate::error::{AppError, AppResult};
use crate::extract::{RequestScope, StrictJson, TicketId};
use crate::response::{JsonResponse, MessageEnvelope};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /v1/tickets`.
///
/// Absent fields decode as empty values so validation reports them along
/// with every other violation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: i64,
}

/// Body of `PATCH /v1/tickets/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub price: Option<i64>,
    /// Version the client last saw. Defaults to the version just read.
    pub version: Option<i32>,
}

/// Public representation of a ticket.
#[derive(Debug, Serialize)]
pub struct TicketBody {
    #[serde(rename = "publicID")]
    pub public_id: String,
    pub title: String,
    pub price: i64,
    pub version: i32,
}

impl From<Ticket> for TicketBody {
    fn from(ticket: Ticket) -> Self {
        Self {
            public_id: ticket.public_id,
            title: ticket.title,
            price: ticket.price,
            version: ticket.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketEnvelope {
    pub ticket: TicketBody,
}

#[derive(Debug, Serialize)]
pub struct TicketsEnvelope {
    pub tickets: Vec<TicketBody>,
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/tickets
///
/// Create a ticket with a freshly generated public identifier.
/// Returns 201 with a `Location` header pointing at the new resource.
pub async fn create_ticket(
    State(state): State<AppState>,
    scope: RequestScope,
    StrictJson(input): StrictJson<CreateTicketRequest>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();
    validate_ticket(&mut v, &input.title, input.price);
    v.finish()?;

    let new_ticket = NewTicket {
        public_id: PublicId::generate(),
        title: input.title,
        price: input.price,
    };
    let ticket = state.tickets.insert(&new_ticket, scope.token()).await?;

    tracing::info!(
        public_id = %ticket.public_id,
        price = ticket.price,
        "Ticket created",
    );

    let location = HeaderValue::try_from(format!("/v1/tickets/{}", ticket.public_id))
        .map_err(|e| AppError::InternalError(format!("invalid Location header: {e}")))?;

    Ok(JsonResponse::new(
        StatusCode::CREATED,
        TicketEnvelope {
            ticket: ticket.into(),
        },
    )
    .header(LOCATION, location))
}

/// GET /v1/tickets
///
/// List tickets with optional full-text `title` filter, paging and sorting.
pub async fn list_tickets(
    State(state): State<AppState>,
    scope: RequestScope,
    Query(params): Query<QueryValues>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();
    let query = validate_list_query(&mut v, &params, SORT_SAFELIST);
    v.finish()?;

    let sorter = Sorter::new(&query.sort, SORT_SAFELIST)
        .map_err(|e| AppError::Core(CoreError::Invalid(e.to_string())))?;

    let filter = TicketFilter {
        title: query.title,
        paginator: Paginator::new(query.page, query.page_size),
        sorter,
    };
    let page = state.tickets.select_multiple(&filter, scope.token()).await?;

    Ok(JsonResponse::ok(TicketsEnvelope {
        tickets: page.tickets.into_iter().map(TicketBody::from).collect(),
        pagination: page.pagination,
    }))
}

/// GET /v1/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    scope: RequestScope,
    TicketId(id): TicketId,
) -> AppResult<impl IntoResponse> {
    let ticket = state.tickets.select_one(&id, scope.token()).await?;

    Ok(JsonResponse::ok(TicketEnvelope {
        ticket: ticket.into(),
    }))
}

/// PATCH /v1/tickets/{id}
///
/// Partially update a ticket under optimistic concurrency. The body is
/// decoded only after the ticket is known to exist, so a missing ticket
/// is reported as 404 even when the body is also bad.
pub async fn update_ticket(
    State(state): State<AppState>,
    scope: RequestScope,
    TicketId(id): TicketId,
    body: Result<StrictJson<UpdateTicketRequest>, AppError>,
) -> AppResult<impl IntoResponse> {
    // Another writer may change the row between this read and the update;
    // the version predicate on the write turns that into a 409.
    let mut ticket = state.tickets.select_one(&id, scope.token()).await?;

    let StrictJson(input) = body?;
    if let Some(title) = input.title {
        ticket.title = title;
    }
    if let Some(price) = input.price {
        ticket.price = price;
    }

    let mut v = Validator::new();
    validate_ticket(&mut v, &ticket.title, ticket.price);
    v.finish()?;

    if let Some(version) = input.version {
        ticket.version = version;
    }

    let updated = state.tickets.update(&ticket, scope.token()).await?;

    tracing::info!(
        public_id = %updated.public_id,
        version = updated.version,
        "Ticket updated",
    );

    Ok(JsonResponse::ok(TicketEnvelope {
        ticket: updated.into(),
    }))
}

/// DELETE /v1/tickets/{id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    scope: RequestScope,
    TicketId(id): TicketId,
) -> AppResult<impl IntoResponse> {
    state.tickets.delete(&id, scope.token()).await?;

    tracing::info!(public_id = %id, "Ticket deleted");

    Ok(JsonResponse::ok(MessageEnvelope {
        message: "ticket successfully deleted".to_string(),
    }))
}
