pub mod api; // REST surface
pub mod auth; // PBKDF2 credential hashing
pub mod billing; // Invoice numbering
pub mod config;
pub mod db;
pub mod mcp; // Stdio tool server
pub mod models;
pub mod normalize; // Reference/date/string cleaning contract
pub mod schedule; // Calendar-date and time-of-day parsing
pub mod views; // Dashboard projections over the cache

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()))
}

/// Initializes tracing for the REST server binary.
pub fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Initializes tracing on stderr only. The MCP binary owns stdout for
/// the protocol stream.
pub fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
