//! REST API over the clinic store.
//!
//! Exposes patients, appointments, treatments, payments and auth as HTTP
//! endpoints for the web client. Routes are nested under `/api/` with a
//! permissive CORS layer; handlers validate payloads before acquiring a
//! store connection, so bad writes never touch the pool.
//!
//! The router is composable: `clinic_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

pub use router::clinic_api_router;
pub use server::ApiServer;

use crate::db::Database;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Database,
}

impl ApiContext {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
