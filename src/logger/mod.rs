//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};
pub use writer::LogLevel;

use crate::config::Config;
use crate::error::ServerError;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), ServerError> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(ServerError::LogLevel)?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
    .map_err(ServerError::LogFile)
}

fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None if level == LogLevel::Info => println!("{message}"),
        None => {}
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write(LogLevel::Info, "======================================");
    write(LogLevel::Info, "getrouter started successfully");
    write(LogLevel::Info, &format!("Listening on: http://{addr}"));
    write(LogLevel::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write(LogLevel::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write(LogLevel::Info, &format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(LogLevel::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(LogLevel::Info, &format!("Error log: {path}"));
    }
    write(LogLevel::Info, "======================================\n");
}

pub fn log_routes(paths: &[&str]) {
    write(LogLevel::Info, &format!("[Routes] {} GET route(s) registered", paths.len()));
    for path in paths {
        write(LogLevel::Info, &format!("  - GET {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(LogLevel::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(LogLevel::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_route_not_found(err: &crate::error::RouteNotFound) {
    write(LogLevel::Debug, &format!("[Route] {err}"));
}

pub fn log_handler_panic(method: &str, path: &str, reason: &str) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Handler for {method} {path} panicked: {reason}"),
    );
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &LogFormat) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(active_connections: usize) {
    write(
        LogLevel::Info,
        &format!("[Shutdown] Listener closed, {active_connections} connection(s) still finishing"),
    );
}
