//! Static file serving module
//!
//! Resolves the request path, checks for a pre-compressed variant,
//! answers conditional requests and streams the file.

use super::compress::{self, Variant};
use super::probe;
use super::resolve::resolve_path;
use super::stream::{self, FileResponse};
use crate::error::StaticError;
use crate::http::{self, cache, mime, ResponseBody};
use crate::logger;
use hyper::header::{ACCEPT_ENCODING, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable handler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeOptions {
    /// Directory request paths are resolved against
    pub root_dir: PathBuf,
    /// `Cache-Control` value sent with 200 and 304 responses
    pub cache_control: String,
    /// Serve `<file>.gz` to clients sending `Accept-Encoding`
    pub compress: bool,
}

impl ServeOptions {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            cache_control: cache::DEFAULT_CACHE_CONTROL.to_string(),
            compress: false,
        }
    }

    #[must_use]
    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = cache_control.into();
        self
    }

    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Static file handler, built once and shared by every request
#[derive(Debug, Clone)]
pub struct StaticFiles {
    options: Arc<ServeOptions>,
}

impl StaticFiles {
    pub fn new(options: ServeOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Answer a request for a file below the root directory
    ///
    /// Only the URI path and the `If-None-Match` / `Accept-Encoding` headers
    /// are read; the request body is ignored.
    pub async fn serve<B>(&self, req: &Request<B>) -> Response<ResponseBody> {
        match self.try_serve(req).await {
            Ok(resp) => resp,
            Err(err) => {
                if matches!(err, StaticError::NotFound | StaticError::NotAFile) {
                    logger::log_debug(&format!("{} -> {err}", req.uri().path()));
                }
                http::build_error_response(&err)
            }
        }
    }

    async fn try_serve<B>(&self, req: &Request<B>) -> Result<Response<ResponseBody>, StaticError> {
        let base = resolve_path(&self.options.root_dir, req.uri().path());

        // The variant is chosen before the main probe so its own metadata
        // drives Content-Length and the ETag.
        // The root itself has no sibling inside the root.
        let variant = if self.accepts_compressed(req) && base != self.options.root_dir {
            compress::select_variant(&base).await
        } else {
            Variant::identity(base.clone())
        };

        let stats = probe::stat_file(&variant.path).await?;
        let etag = stats.etag();

        let if_none_match = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        if cache::check_etag_match(if_none_match, &etag) {
            return Ok(http::build_304_response(&etag, &self.options.cache_control));
        }

        stream::stream_file(
            FileResponse {
                path: &variant.path,
                stats: &stats,
                etag: &etag,
                content_type: mime::content_type_for(&base),
                cache_control: &self.options.cache_control,
                encoding: variant.encoding,
                vary_encoding: self.options.compress,
            },
            req.method() == Method::HEAD,
        )
        .await
    }

    fn accepts_compressed<B>(&self, req: &Request<B>) -> bool {
        self.options.compress && req.headers().contains_key(ACCEPT_ENCODING)
    }
}
