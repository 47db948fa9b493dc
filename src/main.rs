use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod tools;
mod upstream;

/// Configuration file used when no path is given (extension omitted)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    if cfg.generation.api_key.is_empty() {
        logger::log_warning(&format!(
            "No generation API key configured (set {} or generation.api_key); tool requests will fail",
            config::API_KEY_ENV
        ));
    }

    let state = Arc::new(config::AppState::from_config(cfg)?);
    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(tokio::sync::Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    // Connection tasks run on the multi-thread runtime sized by `server.workers`
    server::run_server_loop(listener, state, shutdown).await;

    logger::log_info("Server stopped");
    Ok(())
}
