//! Request handler module
//!
//! Request routing dispatch and the static file pipeline:
//! resolve -> select variant -> probe -> conditional check -> stream.

pub mod compress;
pub mod probe;
pub mod resolve;
pub mod router;
pub mod static_files;
pub mod stream;

// Re-export main entry points
pub use router::handle_request;
pub use static_files::{ServeOptions, StaticFiles};
