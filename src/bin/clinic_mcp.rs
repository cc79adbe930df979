//! MCP stdio server binary.
//!
//! No startup probe: the pool is lazy and a dead database surfaces as
//! in-band tool errors, which is where MCP clients expect failures.

use std::process::ExitCode;

use dental_clinic::config::DatabaseConfig;
use dental_clinic::db::Database;
use dental_clinic::mcp::McpServer;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    dental_clinic::init_stderr_tracing();

    let db_config = DatabaseConfig::from_env();
    tracing::info!("database target: {db_config}");

    let db = match Database::connect(&db_config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("failed to configure the connection pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    let server = McpServer::new(db.clone());
    let outcome = server.run().await;
    db.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("stdio transport failed: {e}");
            ExitCode::FAILURE
        }
    }
}
