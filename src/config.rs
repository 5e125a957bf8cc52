//! Server configuration loaded from environment variables

use std::env;

use thiserror::Error;

/// Default number of events returned when the client polls without a cursor
pub const DEFAULT_EVENTS_LIMIT: i64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    /// Load config from environment variables
    ///
    /// `HOST` and `PORT` fall back to defaults; `DATABASE_URL` is required
    /// and missing it fails startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url,
        })
    }

    /// Full bind address for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            database_url: "postgres://localhost/gitfeed".to_string(),
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_default_limit_is_positive() {
        assert!(DEFAULT_EVENTS_LIMIT > 0);
    }
}
