//! Error types
//!
//! `RouteNotFound` is the only outcome the router itself reports; everything
//! else belongs to startup (configuration, listener binding, log files).

use std::io;
use std::net::AddrParseError;
use thiserror::Error;

/// No GET handler is registered for the requested path, or the method is not GET.
///
/// This is a normal negative result, not a failure. The transport answers it with a 404.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {method} {path}")]
pub struct RouteNotFound {
    pub method: String,
    pub path: String,
}

impl RouteNotFound {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

/// Errors that stop the server from starting or keep it from serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid log level '{0}' (expected error, warn, info or debug)")]
    LogLevel(String),

    #[error("failed to open log file: {0}")]
    LogFile(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
