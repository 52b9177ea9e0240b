//! Domain logic for the ticket service.
//!
//! Nothing in this crate performs I/O: it holds the error taxonomy, the
//! public identifier rules, ticket business rules, the strict JSON decoder,
//! the query-string validator, and the sort/pagination primitives used by
//! the repository layer.

pub mod decode;
pub mod error;
pub mod pagination;
pub mod public_id;
pub mod sort;
pub mod ticket;
pub mod types;
pub mod validation;
