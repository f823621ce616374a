//! Fixed response policy headers.
//!
//! Every response leaving the server carries the same cross-origin and
//! content-protection header set. The handler appends these after building
//! the response, so 404s, redirects and preflight answers get them too.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

/// The header set appended to every response.
///
/// Names are lowercase so they can be used with `HeaderName::from_static`;
/// header names are case-insensitive on the wire.
pub const POLICY_HEADERS: [(&str, &str); 5] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "*"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
];

/// Append the fixed policy headers to a response's header map.
pub fn apply_policy_headers(headers: &mut HeaderMap) {
    for (name, value) in POLICY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}
