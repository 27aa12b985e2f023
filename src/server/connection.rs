// Connection module
// Accepts a single TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::handler;
use crate::logger;

/// Accept and process a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_debug(&format!("Accepted connection from {peer_addr}"));

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Idle wait for the next request and the overall connection deadline.
///
/// `keep_alive_timeout = 0` turns keep-alive off. Otherwise it bounds how long an
/// open connection may sit waiting for request headers.
fn connection_timeouts(performance: &config::PerformanceConfig) -> (Option<Duration>, Duration) {
    let idle = (performance.keep_alive_timeout > 0)
        .then(|| Duration::from_secs(performance.keep_alive_timeout));
    let deadline = performance
        .keep_alive_timeout
        .max(performance.read_timeout)
        .max(performance.write_timeout);
    (idle, Duration::from_secs(deadline))
}

/// Serve one connection in a local task.
///
/// The connection is HTTP/1.1 and watched for graceful shutdown. The active
/// connection counter is decremented when it ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let (idle_timeout, timeout_duration) = connection_timeouts(&state.config.performance);

    let mut builder = http1::Builder::new();
    builder.keep_alive(idle_timeout.is_some());
    if let Some(idle) = idle_timeout {
        builder.timer(TokioTimer::new()).header_read_timeout(idle);
    }

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&service_state);
            async move { handler::handle_request(req, state, Some(peer_addr)).await }
        }),
    );
    let conn = graceful.watch(conn);

    tokio::task::spawn_local(async move {
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
