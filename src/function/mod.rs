//! Function module
//!
//! The request/response model seen by functions, and the functions themselves.
//! Functions know nothing about hyper connections or routing.

mod greeting;
mod request;
mod response;

pub use greeting::{hello, query_name};
pub use request::FunctionRequest;
pub use response::FunctionResponse;
