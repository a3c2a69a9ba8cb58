//! Runtime configuration from the environment (a `.env` file is honoured by the binary).

use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};

/// `DATABASE_URL` value that selects the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory:";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/locadora";
const DEFAULT_PORT: u16 = 4567;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Create the database and tables on startup.
    pub auto_migrate: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        if database_url != MEMORY_DATABASE_URL && !database_url.starts_with("postgres") {
            return Err(ConfigError::DatabaseUrl(database_url));
        }
        let host: IpAddr = parse_or("BIND_ADDR", get("BIND_ADDR"), IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5)?;
        let auto_migrate = parse_or("AUTO_MIGRATE", get("AUTO_MIGRATE"), true)?;
        Ok(AppConfig {
            database_url,
            bind_addr: SocketAddr::new(host, port),
            max_connections,
            auto_migrate,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
