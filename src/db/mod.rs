pub mod pool;
pub mod query;
pub mod repository;
pub mod validate;

pub use pool::Database;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("TLS connector error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
