//! API endpoint handlers, one module per resource.

pub mod appointments;
pub mod auth;
pub mod health;
pub mod patients;
pub mod payments;
pub mod treatments;
