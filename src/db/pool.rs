//! PostgreSQL connection pool.
//!
//! The pool is lazy: building it performs no I/O, connections are opened
//! on first acquisition. Startup therefore runs an explicit probe with a
//! bounded retry loop so a dead database is reported once, loudly, instead
//! of failing every request.

use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use super::StoreError;
use crate::config::{DatabaseConfig, SslMode};

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_schema.sql");

/// Handle to the shared store. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds the pool from configuration. No connection is attempted here.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .dbname(&config.dbname);

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode {
            SslMode::Require => {
                // Managed hosts commonly present self-signed chains.
                let connector = native_tls::TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .build()?;
                let tls = postgres_native_tls::MakeTlsConnector::new(connector);
                Manager::from_config(pg_config, tls, manager_config)
            }
            SslMode::Disable => Manager::from_config(pg_config, NoTls, manager_config),
        };

        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .wait_timeout(Some(Duration::from_secs(config.connect_timeout_secs)))
            .create_timeout(Some(Duration::from_secs(config.connect_timeout_secs)))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        tracing::debug!("connection pool configured: {}", config.describe());
        Ok(Self { pool })
    }

    /// Acquires a pooled connection.
    pub async fn client(&self) -> Result<Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }

    /// Verifies connectivity with up to `attempts` tries, `delay` apart.
    /// Logs each failure; the final error carries the last driver message.
    pub async fn probe(&self, attempts: u32, delay: Duration) -> Result<(), StoreError> {
        let mut last_error = StoreError::Pool("no probe attempted".to_string());
        for attempt in 1..=attempts {
            match self.try_probe().await {
                Ok(()) => {
                    tracing::info!("database connection verified (attempt {attempt})");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        "database probe failed (attempt {attempt}/{attempts}): {e}"
                    );
                    last_error = e;
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        tracing::error!(
            "database unreachable after {attempts} attempts; \
             check DB_HOST/DB_PORT/DB_USER/DB_PASSWORD and that the server is running"
        );
        Err(last_error)
    }

    async fn try_probe(&self) -> Result<(), StoreError> {
        let client = self.client().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Applies the idempotent schema bootstrap.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.client().await?;
        client.batch_execute(SCHEMA_SQL).await?;
        tracing::info!("database schema ensured");
        Ok(())
    }

    /// Closes the pool. Pending acquisitions fail immediately afterwards.
    pub fn close(&self) {
        self.pool.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Pool aimed at a port nothing listens on. Building succeeds because
    /// the pool is lazy; acquisitions fail fast with connection refused.
    pub(crate) fn unreachable_database() -> Database {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            user: "nobody".to_string(),
            password: String::new(),
            dbname: "nothing".to_string(),
            ssl_mode: SslMode::Disable,
            pool_size: 2,
            connect_timeout_secs: 1,
        };
        Database::connect(&config).unwrap()
    }

    #[test]
    fn building_the_pool_does_no_io() {
        let _db = unreachable_database();
    }

    #[tokio::test]
    async fn acquiring_from_a_dead_host_fails() {
        let db = unreachable_database();
        let result = db.client().await;
        assert!(matches!(result, Err(StoreError::Pool(_))));
    }

    #[tokio::test]
    async fn probe_reports_the_last_failure() {
        let db = unreachable_database();
        let result = db.probe(2, Duration::from_millis(10)).await;
        assert!(result.is_err());
    }

    #[test]
    fn schema_sql_creates_all_tables() {
        for table in ["patients", "appointments", "treatments", "payments", "users"] {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "schema is missing {table}"
            );
        }
    }
}
