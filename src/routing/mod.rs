//! Routing module
//!
//! Explicit registration of function handlers by method and exact path,
//! kept separate from the handlers themselves.

mod router;

pub use router::{allow_header, HandlerFn, Resolution, Router};
