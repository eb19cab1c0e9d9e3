//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static file handler and access logging.

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();

    // The body is never read; keep only the head
    let (parts, _) = req.into_parts();
    let req = Request::from_parts(parts, ());

    let response = match check_http_method(req.method()) {
        Some(resp) => resp,
        None => state.files.serve(&req).await,
    };

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return early response if not GET/HEAD
/// Returns Some(response) for OPTIONS/405, None to continue processing
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn access_entry(
    req: &Request<()>,
    resp: &Response<ResponseBody>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = resp.status().as_u16();
    entry.body_bytes = if req.method() == Method::HEAD {
        0
    } else {
        resp.headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::{ServeOptions, StaticFiles};
    use http_body_util::BodyExt;
    use hyper::header::ALLOW;
    use hyper::StatusCode;
    use std::fs;

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist").unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(
            config,
            StaticFiles::new(ServeOptions::new(root)),
        ))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_is_served() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("hello.txt"), "hello").unwrap();

        let req = Request::get("/hello.txt").body(()).unwrap();
        let resp = handle_request(req, state(root.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "hello".as_bytes());
    }

    #[tokio::test]
    async fn test_request_body_is_ignored() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("hello.txt"), "hello").unwrap();

        let req = Request::get("/hello.txt").body("ignored payload").unwrap();
        let resp = handle_request(req, state(root.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("hello.txt"), "hello").unwrap();

        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let req = Request::builder()
                .method(method.clone())
                .uri("/hello.txt")
                .body(())
                .unwrap();
            let resp = handle_request(req, state(root.path()), peer()).await.unwrap();
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_options() {
        let root = tempfile::tempdir().unwrap();
        let req = Request::options("/anything").body(()).unwrap();
        let resp = handle_request(req, state(root.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_access_entry() {
        let req = Request::get("/a.css?v=2")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let resp = Response::builder()
            .status(200)
            .header(CONTENT_LENGTH, 42)
            .body(http::response::empty())
            .unwrap();

        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/a.css");
        assert_eq!(entry.query.as_deref(), Some("v=2"));
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 42);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}
