//! Process configuration read from the environment.

use std::collections::HashMap;

/// Value of `DATABASE_URL` that selects the in-memory store.
pub const MEMORY_DATABASE: &str = "memory";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite:locations.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} is not a port number")]
    InvalidPort { var: &'static str, value: String },
}

/// Which [`LocationStore`](crate::infrastructure::ports::LocationStore)
/// backs the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub store: StoreBackend,
    /// `*` or a comma-separated origin list. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_host = non_empty("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into());

        let port_var = if non_empty("SERVER_PORT").is_some() {
            "SERVER_PORT"
        } else {
            "PORT"
        };
        let server_port = match non_empty(port_var) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                var: port_var,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let store = match non_empty("DATABASE_URL") {
            Some(url) if url.eq_ignore_ascii_case(MEMORY_DATABASE) => StoreBackend::Memory,
            Some(url) => StoreBackend::Sqlite(url),
            None => StoreBackend::Sqlite(DEFAULT_DATABASE_URL.into()),
        };

        Ok(Self {
            server_host,
            server_port,
            store,
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_map(&HashMap::new()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(
            config.store,
            StoreBackend::Sqlite("sqlite:locations.db".into())
        );
        assert_eq!(config.cors_allowed_origins, None);
    }

    #[test]
    fn server_port_wins_over_port() {
        let vars = HashMap::from([("SERVER_PORT", "8080"), ("PORT", "9090")]);

        assert_eq!(AppConfig::from_map(&vars).unwrap().server_port, 8080);
    }

    #[test]
    fn port_is_used_as_fallback() {
        let vars = HashMap::from([("PORT", "9090")]);

        assert_eq!(AppConfig::from_map(&vars).unwrap().server_port, 9090);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let vars = HashMap::from([("SERVER_PORT", "http")]);

        let err = AppConfig::from_map(&vars).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidPort { var: "SERVER_PORT", ref value } if value == "http"
        ));
    }

    #[test]
    fn memory_selects_the_in_memory_store() {
        let vars = HashMap::from([("DATABASE_URL", "memory")]);

        assert_eq!(AppConfig::from_map(&vars).unwrap().store, StoreBackend::Memory);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let vars = HashMap::from([("CORS_ALLOWED_ORIGINS", "  "), ("SERVER_HOST", "")]);
        let config = AppConfig::from_map(&vars).unwrap();

        assert_eq!(config.cors_allowed_origins, None);
        assert_eq!(config.server_host, "0.0.0.0");
    }
}
