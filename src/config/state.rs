// Application state module
// Everything a connection task needs, shared behind one Arc

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::logger::LogFormat;
use crate::router::Router;

/// Application state
///
/// Built once after all routes are registered; read-only afterwards except
/// for the connection counter.
pub struct AppState {
    pub config: Config,
    pub router: Router,
    /// Parsed once from `logging.access_log_format`
    pub access_format: LogFormat,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config, router: Router) -> Self {
        let access_format = LogFormat::parse(&config.logging.access_log_format);
        Self {
            config,
            router,
            access_format,
            active_connections: AtomicUsize::new(0),
        }
    }
}
