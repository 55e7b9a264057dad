// Configuration module entry point
// Layers an optional config file and environment overrides over built-in defaults

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ServerError;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file looked up when no path is given (any extension the `config` crate knows)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `GETROUTER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "GETROUTER";

impl Config {
    /// Load from `config_path` (optional file) plus `GETROUTER_*` environment variables
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        Self::load_with_env(config_path, environment())
    }

    /// Load with an explicit environment source
    pub fn load_with_env(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8081)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }

    /// Upper bound for serving one connection
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Quiet configuration for tests: ephemeral port, no access log
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "error".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive: true,
            read_timeout: 5,
            write_timeout: 5,
            max_connections: None,
        },
        http: HttpConfig {
            max_body_size: 1024,
        },
    }
}
