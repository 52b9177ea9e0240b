//! Request handlers.
//!
//! Handlers delegate to the repositories in `tixer_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod ticket;
