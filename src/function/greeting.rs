//! Greeting function
//!
//! Greets the caller by the `name` query parameter, falling back to a `name`
//! field in a JSON body. Without a name it answers with a hint and the configured key.

use super::{FunctionRequest, FunctionResponse};
use crate::config::FunctionConfig;
use crate::logger;

const NAME_FIELD: &str = "name";

/// Handle one greeting request
pub fn hello(req: &FunctionRequest, config: &FunctionConfig) -> FunctionResponse {
    logger::log_info("HTTP trigger function processed a request.");

    match resolve_name(req) {
        Some(name) => FunctionResponse::ok(format!(
            "Hello, {name}. This HTTP triggered function executed successfully."
        )),
        None => FunctionResponse::ok(format!(
            "This HTTP triggered function executed successfully. \
             Pass a name in the query string or in the request body for a personalized response. \
             My key is {}",
            config.my_key
        )),
    }
}

/// Non-empty `name` from the query string.
///
/// When present it decides the greeting whatever the body holds.
pub fn query_name(req: &FunctionRequest) -> Option<&str> {
    req.param(NAME_FIELD).filter(|n| !n.is_empty())
}

/// Query parameter first, then the JSON body. Empty strings count as absent.
fn resolve_name(req: &FunctionRequest) -> Option<String> {
    if let Some(name) = query_name(req) {
        return Some(name.to_string());
    }

    req.json_body()?
        .get(NAME_FIELD)?
        .as_str()
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;
    use hyper::StatusCode;

    const FALLBACK: &str = "This HTTP triggered function executed successfully. Pass a name in the query string or in the request body for a personalized response. My key is ";

    fn config(my_key: &str) -> FunctionConfig {
        FunctionConfig {
            my_key: my_key.to_string(),
            ..FunctionConfig::default()
        }
    }

    fn call(query: Option<&str>, body: &'static str) -> FunctionResponse {
        hello(
            &FunctionRequest::new(query, Bytes::from_static(body.as_bytes())),
            &config(""),
        )
    }

    #[test]
    fn test_name_from_query() {
        let resp = call(Some("name=World"), "");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.body,
            "Hello, World. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn test_query_wins_over_body() {
        let resp = call(Some("name=World"), r#"{"name": "Ada"}"#);
        assert_eq!(
            resp.body,
            "Hello, World. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn test_name_from_json_body() {
        let resp = call(None, r#"{"name": "Ada"}"#);
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.body,
            "Hello, Ada. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn test_empty_query_name_falls_through_to_body() {
        let resp = call(Some("name="), r#"{"name": "Ada"}"#);
        assert_eq!(
            resp.body,
            "Hello, Ada. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn test_query_name_ignores_body() {
        let req = FunctionRequest::new(Some("name=World"), Bytes::new());
        assert_eq!(query_name(&req), Some("World"));
        assert_eq!(query_name(&FunctionRequest::new(Some("name="), Bytes::new())), None);
        assert_eq!(query_name(&FunctionRequest::new(None, Bytes::new())), None);
    }

    #[test]
    fn test_fallback_without_name_and_unset_key() {
        let resp = call(None, "");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, FALLBACK);
    }

    #[test]
    fn test_malformed_body_falls_back() {
        assert_eq!(call(None, "not-json"), call(None, ""));
    }

    #[test]
    fn test_body_without_usable_name_falls_back() {
        for body in [
            r#"{"other": "x"}"#,
            r#"{"name": ""}"#,
            r#"{"name": 42}"#,
            r#"["Ada"]"#,
            r#""Ada""#,
        ] {
            assert_eq!(call(None, body).body, FALLBACK, "body: {body}");
        }
    }

    #[test]
    fn test_fallback_echoes_key() {
        let resp = hello(&FunctionRequest::new(None, Bytes::new()), &config("abc123"));
        assert_eq!(resp.body, format!("{FALLBACK}abc123"));
    }

    #[test]
    fn test_identical_requests_get_identical_responses() {
        let req = FunctionRequest::new(Some("name=Bob"), Bytes::new());
        let cfg = config("k");
        assert_eq!(hello(&req, &cfg), hello(&req, &cfg));
    }
}
