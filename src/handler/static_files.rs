//! Static file resolution.
//!
//! Maps request paths onto the configured root directory and produces the
//! file, index, listing, redirect, or 404 response.

use crate::config::Config;
use crate::handler::listing;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET/HEAD request for `raw_path` from the configured root
pub async fn serve_path(
    cfg: &Config,
    raw_path: &str,
    is_head: bool,
    if_modified_since: Option<&str>,
) -> Response<Full<Bytes>> {
    let decoded = percent_decode(raw_path);

    let Some(fs_path) = resolve_path(&cfg.serve.root, &decoded) else {
        return http::build_404_response();
    };

    if fs_path.is_dir() {
        // Listings use relative hrefs, so directories must be addressed
        // with a trailing slash.
        if !decoded.ends_with('/') {
            return http::build_redirect_response(&format!("{raw_path}/"), 301);
        }

        for index_file in &cfg.serve.index_files {
            let candidate = fs_path.join(index_file);
            if candidate.is_file() {
                return serve_file(&candidate, is_head, if_modified_since).await;
            }
        }

        return listing::serve_listing(&fs_path, &decoded, is_head).await;
    }

    if fs_path.is_file() {
        return serve_file(&fs_path, is_head, if_modified_since).await;
    }

    http::build_404_response()
}

/// Read a file and build the 200/304 response for it
async fn serve_file(
    path: &Path,
    is_head: bool,
    if_modified_since: Option<&str>,
) -> Response<Full<Bytes>> {
    let mtime = fs::metadata(path)
        .await
        .ok()
        .and_then(|m| m.modified().ok());

    if let Some(mtime) = mtime {
        if cache::not_modified(if_modified_since, mtime) {
            return http::build_304_response();
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    let last_modified = mtime.map(cache::format_http_date);

    http::response::build_file_response(content, content_type, last_modified, is_head)
}

/// Resolve a decoded request path against the root directory.
///
/// Returns `None` for targets that do not exist or that resolve outside
/// the root; both become 404 at the caller.
pub fn resolve_path(root: &str, decoded_path: &str) -> Option<PathBuf> {
    let relative = decoded_path.trim_start_matches('/');

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!("Serve root '{root}' is not accessible: {e}"));
            return None;
        }
    };

    let Ok(target) = root_canonical.join(relative).canonicalize() else {
        return None;
    };

    if !target.starts_with(&root_canonical) {
        logger::log_warning(&format!("Path escape blocked: {decoded_path}"));
        return None;
    }

    Some(target)
}

/// Decode %XX escapes in a request path. Invalid escapes pass through
/// verbatim, and `+` is left alone (it only means space in query strings).
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/plain/path"), "/plain/path");
        assert_eq!(percent_decode("/my%20file.txt"), "/my file.txt");
        assert_eq!(percent_decode("/a%2Fb"), "/a/b");
        assert_eq!(percent_decode("/odd%2"), "/odd%2");
        assert_eq!(percent_decode("/bad%zz"), "/bad%zz");
        assert_eq!(percent_decode("/a+b"), "/a+b");
    }

    fn fixture_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("staticd-resolve-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("hello.txt"), b"hello").unwrap();
        std::fs::write(root.join("sub").join("nested.txt"), b"nested").unwrap();
        root
    }

    #[test]
    fn test_resolve_existing_file() {
        let root = fixture_root("file");
        let resolved = resolve_path(root.to_str().unwrap(), "/hello.txt").unwrap();
        assert!(resolved.ends_with("hello.txt"));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_missing_file_is_none() {
        let root = fixture_root("missing");
        assert!(resolve_path(root.to_str().unwrap(), "/nope.txt").is_none());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_blocks_traversal() {
        let root = fixture_root("traverse");
        // temp_dir itself exists, so without containment this would resolve
        assert!(resolve_path(
            root.join("sub").to_str().unwrap(),
            "/../hello.txt"
        )
        .is_none());
        assert!(resolve_path(root.to_str().unwrap(), "/../../etc/passwd").is_none());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_root_itself() {
        let root = fixture_root("self");
        let resolved = resolve_path(root.to_str().unwrap(), "/").unwrap();
        assert!(resolved.is_dir());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_file_round_trip() {
        let root = fixture_root("serve");
        let resp = serve_file(&root.join("hello.txt"), false, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "5");
        assert!(resp.headers().contains_key("Last-Modified"));
        std::fs::remove_dir_all(&root).unwrap();
    }

    fn fixture_config(root: &Path) -> Config {
        Config {
            server: crate::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            serve: crate::config::ServeConfig {
                root: root.to_str().unwrap().to_string(),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            },
            logging: crate::config::LoggingConfig {
                access_log: false,
                access_log_format: "bracketed".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        use http_body_util::BodyExt;
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serve_path_round_trip() {
        let root = fixture_root("roundtrip");
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/hello.txt", false, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await.as_ref(), b"hello");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_path_missing_is_404() {
        let root = fixture_root("notfound");
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/missing.txt", false, None).await;
        assert_eq!(resp.status(), 404);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_path_directory_listing() {
        let root = fixture_root("listing");
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/", false, None).await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
        assert!(body.contains("Directory listing for /"));
        assert!(body.contains("hello.txt"));
        assert!(body.contains("sub/"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_path_prefers_index_file() {
        let root = fixture_root("index");
        std::fs::write(root.join("index.html"), b"<p>home</p>").unwrap();
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/", false, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await.as_ref(), b"<p>home</p>");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_path_directory_redirects_without_slash() {
        let root = fixture_root("redirect");
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/sub", false, None).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers().get("Location").unwrap(), "/sub/");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_path_decodes_percent_escapes() {
        let root = fixture_root("decode");
        std::fs::write(root.join("my file.txt"), b"spaced").unwrap();
        let cfg = fixture_config(&root);

        let resp = serve_path(&cfg, "/my%20file.txt", false, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await.as_ref(), b"spaced");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_serve_file_not_modified() {
        let root = fixture_root("cached");
        let path = root.join("hello.txt");
        let mtime = std::fs::metadata(&path).unwrap().modified().unwrap();
        let header = cache::format_http_date(mtime);

        let resp = serve_file(&path, false, Some(&header)).await;
        assert_eq!(resp.status(), 304);
        std::fs::remove_dir_all(&root).unwrap();
    }
}
