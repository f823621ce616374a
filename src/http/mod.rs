//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handler: response
//! builders, the MIME table, conditional-request support, and the fixed
//! policy header set applied to every response.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used functions
pub use headers::apply_policy_headers;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_options_response,
    build_redirect_response,
};
