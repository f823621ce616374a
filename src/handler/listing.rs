//! Directory listing generation.
//!
//! Renders an HTML index of a directory: entries sorted case-insensitively,
//! directory names suffixed with a slash, hrefs percent-encoded and display
//! names HTML-escaped.

use crate::http;
use crate::http::response::build_html_response;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// A single listing entry
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Serve the HTML listing for a directory
pub async fn serve_listing(
    dir: &Path,
    request_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match collect_entries(dir).await {
        Ok(entries) => build_html_response(render_listing(request_path, &entries), is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {}",
                dir.display(),
                e
            ));
            http::build_404_response()
        }
    }
}

/// Read a directory's entries, sorted case-insensitively by name
async fn collect_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push(ListingEntry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

/// Render the listing page for a request path
pub fn render_listing(request_path: &str, entries: &[ListingEntry]) -> String {
    let title = escape_html(&format!("Directory listing for {request_path}"));

    let mut items = String::new();
    for entry in entries {
        let display = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        items.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(&display),
            escape_html(&display)
        ));
    }

    format!(
        "<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <hr>\n<ul>\n{items}</ul>\n<hr>\n</body>\n</html>\n"
    )
}

/// Percent-encode a relative href, leaving unreserved characters and `/`
fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &b in name.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(char::from(b));
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Escape text for embedding in HTML
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
