//! Request handler module
//!
//! Turns hyper requests into function invocations and function results back into HTTP responses.

pub mod dispatch;

// Re-export main entry point
pub use dispatch::handle_request;
