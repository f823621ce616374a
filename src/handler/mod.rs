//! Request handler module
//!
//! Entry point for request processing: method dispatch, policy header
//! injection, and access logging around static file resolution.

pub mod listing;
pub mod static_files;

use crate::config::Config;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    cfg: Arc<Config>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let is_head = method == Method::HEAD;

    let if_modified_since = req
        .headers()
        .get("if-modified-since")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let mut response = match method {
        Method::GET | Method::HEAD => {
            static_files::serve_path(&cfg, uri.path(), is_head, if_modified_since.as_deref())
                .await
        }
        Method::OPTIONS => http::build_options_response(),
        _ => http::build_405_response(),
    };

    // Every response carries the fixed policy header set, whatever its
    // status.
    http::apply_policy_headers(response.headers_mut());

    if cfg.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = logger::http_version_label(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(
            Body::size_hint(response.body()).exact().unwrap_or(0),
        )
        .unwrap_or(usize::MAX);
        logger::log_access(&entry, &cfg.logging.access_log_format);
    }

    Ok(response)
}
