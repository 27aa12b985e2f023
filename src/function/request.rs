//! Function request model
//!
//! A host-independent view of one inbound call: decoded query parameters and the raw body.

use hyper::body::Bytes;
use std::collections::HashMap;

/// Request handed to a function by the host layer
#[derive(Debug, Clone, Default)]
pub struct FunctionRequest {
    params: HashMap<String, String>,
    body: Bytes,
}

impl FunctionRequest {
    /// Build a request from the raw query string (without leading `?`) and body.
    ///
    /// Query values are percent-decoded. When a key repeats, the first value wins.
    pub fn new(query: Option<&str>, body: Bytes) -> Self {
        let mut params = HashMap::new();
        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                params
                    .entry(key.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }
        Self { params, body }
    }

    /// Attach a body read after the query was inspected
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Look up a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parse the body as JSON.
    ///
    /// Returns `None` when the body is empty or not valid JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}
