//! REST server binary: probe the store, bootstrap the schema, serve
//! until interrupted.

use std::process::ExitCode;
use std::time::Duration;

use dental_clinic::api::ApiServer;
use dental_clinic::config::{self, DatabaseConfig, ServerConfig};
use dental_clinic::db::Database;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    dental_clinic::init_tracing();

    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);

    let db_config = DatabaseConfig::from_env();
    tracing::info!("database target: {db_config}");

    let db = match Database::connect(&db_config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("failed to configure the connection pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    // probe() already logs each attempt and the final diagnosis.
    if db.probe(5, Duration::from_secs(2)).await.is_err() {
        return ExitCode::FAILURE;
    }
    if let Err(e) = db.ensure_schema().await {
        tracing::error!("schema bootstrap failed: {e}");
        return ExitCode::FAILURE;
    }

    let server_config = ServerConfig::from_env();
    let addr = match server_config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("invalid BIND_ADDR/PORT: {e}");
            return ExitCode::FAILURE;
        }
    };

    let server = match ApiServer::start(db.clone(), addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on http://{}", server.addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("signal handler failed: {e}");
    }
    tracing::info!("shutting down");
    server.stop().await;
    db.close();
    ExitCode::SUCCESS
}
