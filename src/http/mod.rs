//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from file handling.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_405_response, build_error_response, build_options_response,
    ResponseBody,
};
