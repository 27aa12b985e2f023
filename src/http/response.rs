//! HTTP response building module
//!
//! Provides builders for the responses the host layer sends, decoupled from the functions.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::function::FunctionResponse;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Convert a function response into a plain text HTTP response
pub fn build_function_response(resp: FunctionResponse, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = resp.body.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(resp.body)
    };

    Response::builder()
        .status(resp.status)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(resp.status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(status.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from("ok")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_function_response_is_plain_text() {
        let resp = build_function_response(FunctionResponse::ok("Hello, World."), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], TEXT_PLAIN);
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert_eq!(body_string(resp).await, "Hello, World.");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_function_response(FunctionResponse::ok("abc"), true);
        assert_eq!(resp.headers()["Content-Length"], "3");
        assert_eq!(body_string(resp).await, "");
    }

    #[test]
    fn test_options_cors_headers() {
        let resp = build_options_response("GET, POST, OPTIONS", true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Allow"], "GET, POST, OPTIONS");
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");

        let resp = build_options_response("GET, POST, OPTIONS", false);
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[test]
    fn test_405_carries_allow() {
        let resp = build_405_response("GET, POST, OPTIONS");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, POST, OPTIONS");
    }
}
