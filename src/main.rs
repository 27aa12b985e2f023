use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod function;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

/// Config file used when none is given on the command line (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local settings such as MY_KEY may live in a .env file next to the binary
    let dotenv_path = load_dotenv()?;

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    if let Some(path) = dotenv_path {
        logger::log_info(&format!("Loaded environment from {}", path.display()));
    }

    // Build the Tokio runtime, sizing worker threads from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

/// Load `.env` into the process environment; a missing file is not an error
fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    ignore_missing(dotenvy::dotenv())
}

fn ignore_missing<T>(result: Result<T, dotenvy::Error>) -> Result<Option<T>, dotenvy::Error> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::new(Notify::new());

    logger::log_server_start(&addr, &cfg);
    server::start_signal_handler(Arc::clone(&shutdown));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            active_connections,
            shutdown,
        ))
        .await
}
