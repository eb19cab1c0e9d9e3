//! Static file server
//!
//! Serves files below a root directory over HTTP/1 with `ETag` based
//! conditional requests, a configurable `Cache-Control` policy and optional
//! pre-compressed (`.gz`) variants.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::StaticError;
pub use handler::{ServeOptions, StaticFiles};
