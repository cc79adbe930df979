//! Application constants and environment-driven configuration.
//!
//! Everything is read once at startup from process environment variables
//! (after `dotenvy` has folded an optional `.env` file into them). Secrets
//! never appear in logs: [`DatabaseConfig::describe`] is the only sanctioned
//! way to print a database configuration.

use std::fmt;

/// Application name.
pub const APP_NAME: &str = "Dental Clinic";

/// Application version, injected at compile time from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `RUST_LOG`-style filter when the variable is unset.
pub fn default_log_filter() -> &'static str {
    "dental_clinic=info,tower_http=info"
}

/// Whether connections to PostgreSQL are negotiated over TLS.
///
/// `Require` accepts self-signed chains, matching managed-hosting setups
/// where the CA is not in the local trust store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    Require,
}

impl SslMode {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "require" | "required" | "true" | "1" => SslMode::Require,
            _ => SslMode::Disable,
        }
    }
}

/// Connection settings for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub ssl_mode: SslMode,
    /// Upper bound on pooled connections.
    pub pool_size: usize,
    /// Seconds to wait for a pooled connection before giving up.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "dental_clinic".to_string(),
            ssl_mode: SslMode::Disable,
            pool_size: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Builds the configuration from `DB_*` environment variables, falling
    /// back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("DB_HOST", &defaults.host),
            port: env_parsed("DB_PORT", defaults.port),
            user: env_string("DB_USER", &defaults.user),
            password: env_string("DB_PASSWORD", &defaults.password),
            dbname: env_string("DB_NAME", &defaults.dbname),
            ssl_mode: std::env::var("DB_SSLMODE")
                .map(|v| SslMode::from_env_value(&v))
                .unwrap_or(defaults.ssl_mode),
            pool_size: env_parsed("DB_POOL_SIZE", defaults.pool_size),
            connect_timeout_secs: env_parsed("DB_CONNECT_TIMEOUT", defaults.connect_timeout_secs),
        }
    }

    /// Loggable summary. Deliberately omits the password.
    pub fn describe(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} ssl={:?} pool_size={}",
            self.host, self.port, self.dbname, self.user, self.ssl_mode, self.pool_size
        )
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Listen settings for the REST server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_string("BIND_ADDR", &defaults.bind_addr),
            port: env_parsed("PORT", defaults.port),
        }
    }

    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind_addr, self.port).parse()
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_constants() {
        assert_eq!(APP_NAME, "Dental Clinic");
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn test_database_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "dental_clinic");
        assert_eq!(config.ssl_mode, SslMode::Disable);
        assert_eq!(config.pool_size, 10);
    }

    #[test]
    fn test_ssl_mode_parsing() {
        assert_eq!(SslMode::from_env_value("require"), SslMode::Require);
        assert_eq!(SslMode::from_env_value("REQUIRE"), SslMode::Require);
        assert_eq!(SslMode::from_env_value("1"), SslMode::Require);
        assert_eq!(SslMode::from_env_value("disable"), SslMode::Disable);
        assert_eq!(SslMode::from_env_value(""), SslMode::Disable);
        assert_eq!(SslMode::from_env_value("nonsense"), SslMode::Disable);
    }

    #[test]
    fn test_describe_redacts_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let described = config.describe();
        assert!(!described.contains("hunter2"));
        assert!(described.contains("dbname=dental_clinic"));
    }

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        };
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }
}
