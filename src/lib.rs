//! staticd — a static file server with fixed policy headers.
//!
//! Serves a root directory over HTTP/1, appends the same cross-origin and
//! content-protection header set to every response, and writes an access
//! log line per request. Requests are handled one at a time on a single
//! thread.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
