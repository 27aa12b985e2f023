//! Request dispatch module
//!
//! Entry point for HTTP request processing: health checks, route resolution,
//! body limits, function invocation and access logging.

use crate::config::AppState;
use crate::function::{self, FunctionRequest};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{allow_header, Resolution};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut response = dispatch(&parts, body, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(remote_addr, parts.method.as_str(), parts.uri.path());
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_string(&parts.headers, REFERER.as_str());
        entry.user_agent = header_string(&parts.headers, USER_AGENT.as_str());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route one request to a health probe, a function, or an error response
async fn dispatch<B>(parts: &Parts, body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let path = parts.uri.path();
    let health = &state.config.health;

    // Health check endpoints (highest priority, always fast)
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    if parts.method == Method::OPTIONS {
        return match state.router.allowed_methods(path) {
            Some(methods) => {
                http::build_options_response(&allow_header(methods), state.config.http.enable_cors)
            }
            None => http::build_404_response(),
        };
    }

    // HEAD is answered like GET without a body
    let is_head = parts.method == Method::HEAD;
    let get = Method::GET;
    let method = if is_head { &get } else { &parts.method };

    let handler = match state.router.resolve(method, path) {
        Resolution::Matched(handler) => handler,
        Resolution::MethodNotAllowed(methods) => {
            logger::log_warning(&format!("Method not allowed: {} {path}", parts.method));
            return http::build_405_response(&allow_header(methods));
        }
        Resolution::NotFound => return http::build_404_response(),
    };

    let mut request = FunctionRequest::new(parts.uri.query(), Bytes::new());

    // A query name settles the greeting, so the body is neither limited nor read
    if function::query_name(&request).is_none() {
        let max_body_size = state.config.http.max_body_size;
        if let Some(resp) = check_body_size(&parts.headers, max_body_size) {
            return resp;
        }

        match read_body(body, max_body_size).await {
            Ok(bytes) => request = request.with_body(bytes),
            Err(resp) => return resp,
        }
    }

    let response = handler(&request, &state.config.function);
    http::build_function_response(response, is_head)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the body up to `max_body_size`.
///
/// A body that cannot be read is treated as empty; one that outgrows the
/// limit mid-stream gets a 413.
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while streaming"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_debug(&format!("Failed to read request body, treating as empty: {e}"));
            Ok(Bytes::new())
        }
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
