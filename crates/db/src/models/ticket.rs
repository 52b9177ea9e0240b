//! Ticket rows and repository inputs.

use sqlx::FromRow;
use tixer_core::pagination::{Pagination, Paginator};
use tixer_core::public_id::PublicId;
use tixer_core::sort::Sorter;
use tixer_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tickets` table.
///
/// `id` is internal; clients address tickets by `public_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    pub id: DbId,
    pub public_id: String,
    pub title: String,
    pub price: i64,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    pub fn public_id(&self) -> PublicId {
        PublicId::from_trusted(self.public_id.clone())
    }
}

/// A ticket row plus the window-function total of all matching rows.
#[derive(Debug, FromRow)]
pub(crate) struct CountedTicket {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub ticket: Ticket,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Candidate for insertion. Business rules are checked by the caller.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub public_id: PublicId,
    pub title: String,
    pub price: i64,
}

/// Filter, ordering and paging for a list query.
///
/// `sorter` is the only route by which request input reaches the ORDER BY
/// clause, and it has already been checked against a safelist.
#[derive(Debug, Clone)]
pub struct TicketFilter {
    /// Full-text match against the title; empty matches everything.
    pub title: String,
    pub paginator: Paginator,
    pub sorter: Sorter,
}

/// One page of a list query.
#[derive(Debug, Clone)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub pagination: Pagination,
}
