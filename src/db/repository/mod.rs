//! Repository layer, entity-scoped store operations.
//!
//! Functions take a borrowed [`tokio_postgres::Client`] so one pooled
//! connection can serve validation and the write that follows it. Writes
//! return the stored row via a read-back query, joined with the patient
//! display fields where the entity has them.

mod appointment;
mod patient;
mod payment;
mod treatment;
mod user;

pub use appointment::*;
pub use patient::*;
pub use payment::*;
pub use treatment::*;
pub use user::*;
