pub mod ticket_repo;

pub use ticket_repo::TicketRepo;
