use std::sync::Arc;
use tokio::sync::Notify;

use getrouter::{config, logger, server, Router};

const HELLO_BODY: &str = r#"{"message":"Hello, World!"}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker count from config, otherwise one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

/// All routes the binary serves
fn build_router() -> Router {
    let mut router = Router::new();
    router.register_get("/hello", |ctx| ctx.json(200, HELLO_BODY));
    router
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let router = build_router();
    logger::log_server_start(&addr, &cfg);
    logger::log_routes(&router.paths());

    // Registration is over; from here on the router is shared read-only
    let state = Arc::new(config::AppState::new(cfg, router));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));
    server::start_server_loop(listener, state, shutdown).await;
    Ok(())
}
