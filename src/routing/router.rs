//! Route table
//!
//! Maps an exact path and a set of methods to a function handler.

use crate::config::FunctionConfig;
use crate::function::{self, FunctionRequest, FunctionResponse};
use hyper::Method;

/// Function handler signature
pub type HandlerFn = fn(&FunctionRequest, &FunctionConfig) -> FunctionResponse;

/// A registered route
#[derive(Debug, Clone)]
struct RouteEntry {
    path: String,
    methods: Vec<Method>,
    handler: HandlerFn,
}

/// Result of resolving a request against the route table
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    Matched(HandlerFn),
    /// Path is registered but not for this method; carries the allowed methods
    MethodNotAllowed(&'a [Method]),
    NotFound,
}

/// Explicit method + path router
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the greeting function mounted at `config.path` for GET and POST
    pub fn for_function(config: &FunctionConfig) -> Self {
        Self::new().route(&config.path, &[Method::GET, Method::POST], function::hello)
    }

    /// Register a handler. Routes are matched in registration order.
    #[must_use]
    pub fn route(mut self, path: &str, methods: &[Method], handler: HandlerFn) -> Self {
        self.routes.push(RouteEntry {
            path: path.to_string(),
            methods: methods.to_vec(),
            handler,
        });
        self
    }

    /// Resolve a request by exact path, then by method
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let Some(entry) = self.routes.iter().find(|r| r.path == path) else {
            return Resolution::NotFound;
        };

        if entry.methods.contains(method) {
            Resolution::Matched(entry.handler)
        } else {
            Resolution::MethodNotAllowed(&entry.methods)
        }
    }

    /// Allowed methods for a registered path
    pub fn allowed_methods(&self, path: &str) -> Option<&[Method]> {
        self.routes
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.methods.as_slice())
    }
}

/// Render methods for an `Allow` header, e.g. "GET, POST, OPTIONS"
pub fn allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .chain(std::iter::once("OPTIONS"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;

    fn fixed(_req: &FunctionRequest, _cfg: &FunctionConfig) -> FunctionResponse {
        FunctionResponse::ok("fixed")
    }

    fn call(handler: HandlerFn) -> FunctionResponse {
        handler(
            &FunctionRequest::new(None, Bytes::new()),
            &FunctionConfig::default(),
        )
    }

    #[test]
    fn test_resolve_exact_path() {
        let router = Router::new().route("/fixed", &[Method::GET], fixed);

        match router.resolve(&Method::GET, "/fixed") {
            Resolution::Matched(handler) => assert_eq!(call(handler).body, "fixed"),
            other => panic!("expected match, got {other:?}"),
        }
        assert!(matches!(
            router.resolve(&Method::GET, "/fixed/"),
            Resolution::NotFound
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/fix"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_resolve_wrong_method() {
        let router = Router::new().route("/fixed", &[Method::GET, Method::POST], fixed);
        match router.resolve(&Method::DELETE, "/fixed") {
            Resolution::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, &[Method::GET, Method::POST]);
            }
            other => panic!("expected 405, got {other:?}"),
        }
    }

    #[test]
    fn test_first_registration_wins() {
        let router = Router::new()
            .route("/dup", &[Method::GET], fixed)
            .route("/dup", &[Method::POST], function::hello);
        assert!(matches!(
            router.resolve(&Method::POST, "/dup"),
            Resolution::MethodNotAllowed(_)
        ));
    }

    #[test]
    fn test_function_router() {
        let config = FunctionConfig::default();
        let router = Router::for_function(&config);

        assert!(matches!(
            router.resolve(&Method::GET, "/hello"),
            Resolution::Matched(_)
        ));
        assert!(matches!(
            router.resolve(&Method::POST, "/hello"),
            Resolution::Matched(_)
        ));
        assert!(matches!(
            router.resolve(&Method::PUT, "/hello"),
            Resolution::MethodNotAllowed(_)
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_function_router_custom_path() {
        let config = FunctionConfig {
            path: "/api/hello".to_string(),
            ..FunctionConfig::default()
        };
        let router = Router::for_function(&config);
        assert!(matches!(
            router.resolve(&Method::GET, "/api/hello"),
            Resolution::Matched(_)
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/hello"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_allow_header() {
        let router = Router::for_function(&FunctionConfig::default());
        let methods = router.allowed_methods("/hello").unwrap();
        assert_eq!(allow_header(methods), "GET, POST, OPTIONS");
        assert!(router.allowed_methods("/nope").is_none());
    }
}
