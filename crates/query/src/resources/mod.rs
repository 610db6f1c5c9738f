//! Concrete list resources.

pub mod payments;
pub mod tickets;

pub use payments::{Payment, PaymentFilters, Payments};
pub use tickets::{Ticket, TicketFilters, TicketPriority, TicketStatus, Tickets};

/// Default page size of every list view.
pub const DEFAULT_PER_PAGE: i64 = 10;
