// Server loop module
// Accepts connections until shutdown is requested, then drains them

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Run the accept loop on the current `LocalSet`.
///
/// Returns once `shutdown` is notified and in-flight connections have
/// finished, or the drain period (the larger of the read and write timeouts)
/// has elapsed.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &graceful);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let performance = &state.config.performance;
    let drain_period = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));

    tokio::select! {
        () = graceful.shutdown() => logger::log_info("All connections closed"),
        () = tokio::time::sleep(drain_period) => {
            logger::log_warning(&format!(
                "Drain period of {}s elapsed with {} connection(s) still open",
                drain_period.as_secs(),
                active_connections.load(Ordering::SeqCst)
            ));
        }
    }

    Ok(())
}
