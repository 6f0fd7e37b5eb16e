//! Server configuration from environment

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default host address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port number
pub const DEFAULT_PORT: u16 = 5000;

/// Default CORS origins (localhost for development)
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Pipeline TOML file; `.leparcours/config.toml` is tried when unset
    pub pipeline_config: Option<PathBuf>,

    /// Overrides the pipeline's graph database path
    pub db_path: Option<String>,

    /// Enable request tracing
    pub enable_logging: bool,

    /// Log level for tracing
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            pipeline_config: None,
            db_path: None,
            enable_logging: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables with fallback to defaults
    ///
    /// Environment variables:
    /// - `LESERVE_HOST` - Server host
    /// - `LESERVE_PORT` - Server port
    /// - `LESERVE_CORS_ORIGINS` - Comma-separated allowed origins
    /// - `LESERVE_CONFIG` - Pipeline TOML file
    /// - `LESERVE_DB_PATH` - Database path
    /// - `LESERVE_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("LESERVE_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("LESERVE_PORT").and_then(|p| p.parse::<u16>().ok()) {
            config.port = port;
        }

        if let Some(origins) = lookup("LESERVE_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(path) = lookup("LESERVE_CONFIG") {
            config.pipeline_config = Some(PathBuf::from(path));
        }

        if let Some(db_path) = lookup("LESERVE_DB_PATH") {
            config.db_path = Some(db_path);
        }

        if let Some(log_level) = lookup("LESERVE_LOG_LEVEL") {
            config.log_level = log_level;
        }

        config
    }

    /// Get the socket address for the server
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid address: {}", e))
    }

    /// Get the full server URL
    #[must_use]
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Whether any origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be zero".to_string());
        }

        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.cors_origins.is_empty() {
            return Err("At least one CORS origin is required".to_string());
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.cors_origins.is_empty());
        assert!(config.db_path.is_none());
        assert!(config.enable_logging);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("LESERVE_HOST", "0.0.0.0"),
            ("LESERVE_PORT", "8080"),
            ("LESERVE_CORS_ORIGINS", "https://app.example, *"),
            ("LESERVE_DB_PATH", "/tmp/test.db"),
            ("LESERVE_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://app.example", "*"]);
        assert!(config.allows_any_origin());
        assert_eq!(config.db_path.as_deref(), Some("/tmp/test.db"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_unparseable_port_keeps_default() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "LESERVE_PORT").then(|| "eighty".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_config_socket_addr() {
        let config = ServerConfig::default();
        let addr = config.socket_addr().expect("Default socket address should be valid");
        assert_eq!(addr.ip(), std::net::Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_config_server_url() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.server_url(), "http://localhost:3000");
    }

    #[test]
    fn test_config_validate_failures() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            host: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            log_level: "invalid".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            cors_origins: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
