//! Repository for the `tickets` table.
//!
//! Every call is bounded twice: by its own query timeout, and by the
//! caller's [`CancellationToken`]. Whichever fires first drops the in-flight
//! query future.
//!
//! Dropping the future does not stop Postgres from finishing the statement,
//! so writes run inside a transaction carrying a matching
//! `statement_timeout`, and commit only while the token is still live. An
//! abandoned write is rolled back when its [`Transaction`] is dropped.

use std::future::Future;
use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};
use tixer_core::pagination::calculate_pagination;
use tixer_core::public_id::PublicId;
use tokio_util::sync::CancellationToken;

use crate::error::{RepoError, RepoResult};
use crate::models::ticket::{CountedTicket, NewTicket, Ticket, TicketFilter, TicketPage};

/// Column list for `tickets` queries.
const COLUMNS: &str = "id, public_id, title, price, version, created_at, updated_at";

/// Provides data access for tickets.
#[derive(Debug, Clone)]
pub struct TicketRepo {
    pool: PgPool,
    query_timeout: Duration,
}

impl TicketRepo {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Insert a new ticket; the database assigns `id`, the initial
    /// `version` and both timestamps.
    pub async fn insert(
        &self,
        ticket: &NewTicket,
        cancel: &CancellationToken,
    ) -> RepoResult<Ticket> {
        let query = format!(
            "INSERT INTO tickets (public_id, title, price) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        self.bounded(cancel, async {
            let mut tx = self.begin_write().await?;
            let inserted = sqlx::query_as::<_, Ticket>(&query)
                .bind(ticket.public_id.as_str())
                .bind(&ticket.title)
                .bind(ticket.price)
                .fetch_one(&mut *tx)
                .await
                .map_err(RepoError::database("failed to insert ticket"))?;
            commit_unless_cancelled(tx, cancel).await?;
            Ok(inserted)
        })
        .await
    }

    /// Find a ticket by its public identifier.
    pub async fn select_one(
        &self,
        public_id: &PublicId,
        cancel: &CancellationToken,
    ) -> RepoResult<Ticket> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE public_id = $1");
        self.bounded(cancel, async {
            sqlx::query_as::<_, Ticket>(&query)
                .bind(public_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(RepoError::database("failed to select ticket"))?
                .ok_or(RepoError::NotFound)
        })
        .await
    }

    /// List one page of tickets matching `filter`.
    ///
    /// The total number of matching rows comes from a window function in
    /// the same statement, so it is consistent with the returned page. A
    /// page past the end yields no rows and therefore empty pagination.
    pub async fn select_multiple(
        &self,
        filter: &TicketFilter,
        cancel: &CancellationToken,
    ) -> RepoResult<TicketPage> {
        let mut order_clause = filter.sorter.order_clause();
        if filter.sorter.column() != "id" {
            order_clause.push_str(", id ASC");
        }

        let query = format!(
            "SELECT count(*) OVER() AS total_records, {COLUMNS} FROM tickets \
             WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '') \
             ORDER BY {order_clause} \
             LIMIT $2 OFFSET $3"
        );

        let rows = self
            .bounded(cancel, async {
                sqlx::query_as::<_, CountedTicket>(&query)
                    .bind(&filter.title)
                    .bind(filter.paginator.limit())
                    .bind(filter.paginator.offset())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(RepoError::database("failed to select tickets"))
            })
            .await?;

        let total_records = rows.first().map_or(0, |row| row.total_records);
        let pagination = calculate_pagination(
            total_records,
            filter.paginator.page(),
            filter.paginator.page_size(),
        );
        let tickets = rows.into_iter().map(|row| row.ticket).collect();

        Ok(TicketPage {
            tickets,
            pagination,
        })
    }

    /// Write `title` and `price`, bump `version` and `updated_at`, but only
    /// while the stored version still equals `ticket.version`.
    ///
    /// Zero matching rows is reported as [`RepoError::EditConflict`],
    /// whether the version moved on or the row was deleted meanwhile.
    pub async fn update(&self, ticket: &Ticket, cancel: &CancellationToken) -> RepoResult<Ticket> {
        let query = format!(
            "UPDATE tickets SET \
                 title = $1, \
                 price = $2, \
                 version = version + 1, \
                 updated_at = NOW() \
             WHERE public_id = $3 AND version = $4 \
             RETURNING {COLUMNS}"
        );
        self.bounded(cancel, async {
            let mut tx = self.begin_write().await?;
            let updated = sqlx::query_as::<_, Ticket>(&query)
                .bind(&ticket.title)
                .bind(ticket.price)
                .bind(&ticket.public_id)
                .bind(ticket.version)
                .fetch_optional(&mut *tx)
                .await
                .map_err(RepoError::database("failed to update ticket"))?
                .ok_or(RepoError::EditConflict)?;
            commit_unless_cancelled(tx, cancel).await?;
            Ok(updated)
        })
        .await
    }

    /// Delete a ticket by its public identifier.
    pub async fn delete(&self, public_id: &PublicId, cancel: &CancellationToken) -> RepoResult<()> {
        self.bounded(cancel, async {
            let mut tx = self.begin_write().await?;
            let result = sqlx::query("DELETE FROM tickets WHERE public_id = $1")
                .bind(public_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(RepoError::database("failed to delete ticket"))?;

            if result.rows_affected() == 0 {
                return Err(RepoError::NotFound);
            }
            commit_unless_cancelled(tx, cancel).await
        })
        .await
    }

    /// Open a write transaction whose statements the server itself aborts
    /// after `query_timeout`.
    async fn begin_write(&self) -> RepoResult<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepoError::database("failed to begin transaction"))?;

        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", self.query_timeout.as_millis()))
            .execute(&mut *tx)
            .await
            .map_err(RepoError::database("failed to set statement timeout"))?;

        Ok(tx)
    }

    /// Run `fut` under this repository's query timeout and the caller's
    /// cancellation scope.
    async fn bounded<T, F>(&self, cancel: &CancellationToken, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RepoError::Cancelled),
            outcome = tokio::time::timeout(self.query_timeout, fut) => match outcome {
                Ok(Err(RepoError::Database { source, .. })) if is_statement_timeout(&source) => {
                    tracing::warn!(timeout = ?self.query_timeout, "Statement timed out");
                    Err(RepoError::Timeout(self.query_timeout))
                }
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout = ?self.query_timeout, "Query timed out");
                    Err(RepoError::Timeout(self.query_timeout))
                }
            },
        }
    }
}

/// Commit `tx` unless the caller has gone away; otherwise drop it, which
/// rolls the write back.
async fn commit_unless_cancelled(
    tx: Transaction<'static, Postgres>,
    cancel: &CancellationToken,
) -> RepoResult<()> {
    if cancel.is_cancelled() {
        return Err(RepoError::Cancelled);
    }
    tx.commit()
        .await
        .map_err(RepoError::database("failed to commit transaction"))
}

/// SQLSTATE 57014 (`query_canceled`) is what `statement_timeout` raises.
fn is_statement_timeout(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("57014"))
}
