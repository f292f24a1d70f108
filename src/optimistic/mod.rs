//! Optimistic updates with rollback.
//!
//! A mutation is shown immediately, sent to the API, and then either
//! committed (taking the server's authoritative value when it sends one) or
//! reverted with an error toast. There is no retry; the user re-triggers.

mod controller;
mod field;

pub use controller::{MutationOutcome, Optimistic};
pub use field::{FieldStatus, OptimisticField, Ticket};
