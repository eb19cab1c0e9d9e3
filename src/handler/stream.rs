//! Response streaming module
//!
//! Writes the 200 headers and pipes the file into the response body.

use super::probe::FileStats;
use crate::error::StaticError;
use crate::http::response::{self, ResponseBody};
use crate::logger;
use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::header::{
    ACCEPT_ENCODING, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ETAG, VARY,
};
use hyper::{Response, StatusCode};
use std::path::Path;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Everything needed to answer with the file's content
#[derive(Debug)]
pub struct FileResponse<'a> {
    pub path: &'a Path,
    pub stats: &'a FileStats,
    pub etag: &'a str,
    pub content_type: &'static str,
    pub cache_control: &'a str,
    /// `Content-Encoding` of the file on disk
    pub encoding: Option<&'static str>,
    /// Add `Vary: Accept-Encoding`
    pub vary_encoding: bool,
}

/// Open the file and build a streaming 200 response
///
/// The file is opened before any header is committed, so an open failure
/// still produces a clean 500. A read failure after that point ends the
/// body stream with an error; hyper then aborts the connection.
pub async fn stream_file(
    file: FileResponse<'_>,
    is_head: bool,
) -> Result<Response<ResponseBody>, StaticError> {
    let body = if is_head {
        response::empty()
    } else {
        let handle = File::open(file.path).await.map_err(|e| {
            logger::log_error(&format!("Failed to open '{}': {e}", file.path.display()));
            StaticError::Read(e)
        })?;
        file_body(handle, file.path)
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, file.content_type)
        .header(CONTENT_LENGTH, file.stats.size)
        .header(ETAG, file.etag)
        .header(CACHE_CONTROL, file.cache_control);

    if let Some(encoding) = file.encoding {
        builder = builder.header(CONTENT_ENCODING, encoding);
    }
    if file.vary_encoding {
        builder = builder.header(VARY, ACCEPT_ENCODING.as_str());
    }

    Ok(builder.body(body).unwrap_or_else(|e| {
        response::log_build_error("200", &e);
        Response::new(response::empty())
    }))
}

fn file_body(handle: File, path: &Path) -> ResponseBody {
    let display = path.display().to_string();
    let stream = ReaderStream::new(handle)
        .inspect_err(move |e| {
            logger::log_error(&format!("Error reading file '{display}' mid-stream: {e}"));
        })
        .map_ok(Frame::data);
    StreamBody::new(stream).boxed_unsync()
}
