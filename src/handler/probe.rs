//! File probing module
//!
//! Classifies filesystem metadata for a candidate path.

use crate::error::StaticError;
use crate::http::cache;
use crate::logger;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Metadata of a regular file that is about to be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Unique file identifier, only used as `ETag` input
    pub file_id: u64,
}

impl FileStats {
    fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified()?,
            file_id: file_id(metadata),
        })
    }

    /// `ETag` for this version of the file
    pub fn etag(&self) -> String {
        cache::generate_etag(self.file_id, self.modified)
    }
}

#[cfg(unix)]
fn file_id(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn file_id(_metadata: &Metadata) -> u64 {
    0
}

/// Stat `path` and classify the outcome
///
/// - missing path or a non-directory parent segment: [`StaticError::NotFound`]
/// - anything but a regular file: [`StaticError::NotAFile`]
/// - any other failure: [`StaticError::Probe`]
pub async fn stat_file(path: &Path) -> Result<FileStats, StaticError> {
    let metadata = match fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Err(StaticError::NotFound);
        }
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
            return Err(StaticError::Probe(e));
        }
    };

    if !metadata.is_file() {
        return Err(StaticError::NotAFile);
    }

    FileStats::from_metadata(&metadata).map_err(|e| {
        logger::log_error(&format!(
            "Failed to read metadata of '{}': {e}",
            path.display()
        ));
        StaticError::Probe(e)
    })
}
