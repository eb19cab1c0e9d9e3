//! Request error module
//!
//! Errors produced while resolving and streaming a static file. Every variant
//! maps to an HTTP status and a short client-facing message.

use hyper::StatusCode;
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaticError {
    /// Path or one of its parent segments does not exist
    #[error("resource does not exist")]
    NotFound,

    /// Path exists but is not a regular file (e.g. a directory)
    #[error("resource is not a file")]
    NotAFile,

    /// Metadata lookup failed for a reason other than a missing path
    #[error("failed to stat file: {0}")]
    Probe(#[source] io::Error),

    /// File could not be opened or read for streaming
    #[error("failed to read file: {0}")]
    Read(#[source] io::Error),
}

impl StaticError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAFile => StatusCode::BAD_REQUEST,
            Self::Probe(_) | Self::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Never carries io error details.
    pub fn friendly(&self) -> FriendlyError {
        let status = self.status();
        FriendlyError {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Error"),
        }
    }
}

/// JSON error body written to the client
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FriendlyError {
    pub status: u16,
    pub message: &'static str,
}
