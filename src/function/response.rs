//! Function response model

use hyper::StatusCode;

/// Response returned by a function; the host transmits it verbatim as plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    pub status: StatusCode,
    pub body: String,
}

impl FunctionResponse {
    pub const fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    /// 200 OK with a text body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body.into())
    }
}
