//! Conditional request support.
//!
//! `Last-Modified` / `If-Modified-Since` handling. Comparison happens at
//! whole-second resolution, since an HTTP-date cannot express anything
//! finer than a filesystem mtime's seconds.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a filesystem mtime as an HTTP-date (IMF-fixdate, RFC 7231).
///
/// # Examples
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use staticd::http::cache::format_http_date;
/// let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
/// assert_eq!(format_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(mtime: SystemTime) -> String {
    let dt: DateTime<Utc> = mtime.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP-date header value.
///
/// The RFC 2822 grammar covers the IMF-fixdate form browsers send,
/// including the `GMT` zone name. Unparseable values yield `None` and are
/// treated as if the header were absent.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether the client's cached copy is still current.
///
/// Returns true when `If-Modified-Since` is present, parseable, and not
/// older than the file's mtime, in which case the caller answers 304.
pub fn not_modified(if_modified_since: Option<&str>, mtime: SystemTime) -> bool {
    let Some(header) = if_modified_since else {
        return false;
    };
    let Some(client_time) = parse_http_date(header) else {
        return false;
    };
    let file_time: DateTime<Utc> = mtime.into();
    file_time.timestamp() <= client_time.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    const MTIME_SECS: u64 = 1_700_000_000;

    fn mtime() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(MTIME_SECS)
    }

    #[test]
    fn test_round_trip() {
        let formatted = format_http_date(mtime());
        let parsed = parse_http_date(&formatted).expect("formatted date should parse");
        assert_eq!(parsed.timestamp(), i64::try_from(MTIME_SECS).unwrap());
    }

    #[test]
    fn test_not_modified_when_cache_is_current() {
        let header = format_http_date(mtime());
        assert!(not_modified(Some(&header), mtime()));
    }

    #[test]
    fn test_modified_when_file_is_newer() {
        let header = format_http_date(mtime());
        let newer = mtime() + Duration::from_secs(60);
        assert!(!not_modified(Some(&header), newer));
    }

    #[test]
    fn test_not_modified_when_cache_is_newer() {
        let header = format_http_date(mtime() + Duration::from_secs(60));
        assert!(not_modified(Some(&header), mtime()));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert!(!not_modified(None, mtime()));
        assert!(!not_modified(Some("last tuesday"), mtime()));
    }
}
