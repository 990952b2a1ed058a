//! Access-log line parsing and formatting.
//!
//! The API writes one Common Log Format line per response and the sentinel
//! tails the same file, so both directions live here:
//!
//! ```text
//! 203.0.113.42 - - [04/Dec/2025:16:30:45 +0000] "GET /tasks?id=1 HTTP/1.1" 200 512 "-" "curl/8.0"
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Timestamp;

static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:\.\d{1,3}){3}").expect("valid regex"));

static REQUEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:GET|POST|PUT|DELETE|HEAD)\s+(?P<path>[^\s]+)"#).expect("valid regex")
});

/// Return the first dotted-quad address in the line, if any.
///
/// No octet range check is applied; `999.1.1.1` is returned as-is.
pub fn extract_ip(line: &str) -> Option<&str> {
    IP_RE.find(line).map(|m| m.as_str())
}

/// Return the request path from the quoted request line, if any.
pub fn extract_path(line: &str) -> Option<&str> {
    REQUEST_RE
        .captures(line)
        .and_then(|c| c.name("path"))
        .map(|m| m.as_str())
}

/// Decode `%XX` escapes and `+` (as space) in a URL path or query.
///
/// Malformed escapes are kept verbatim; invalid UTF-8 is replaced lossily.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
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

/// One HTTP exchange, as recorded in the access log.
#[derive(Debug, Clone)]
pub struct AccessLogEntry<'a> {
    pub client_ip: &'a str,
    pub time: Timestamp,
    pub method: &'a str,
    /// Path including the query string, if any.
    pub path: &'a str,
    pub status: u16,
    pub size: u64,
    pub user_agent: Option<&'a str>,
}

/// Render an entry in Common Log Format (newline not included).
pub fn format_common_log(entry: &AccessLogEntry<'_>) -> String {
    format!(
        "{} - - [{}] \"{} {} HTTP/1.1\" {} {} \"-\" \"{}\"",
        entry.client_ip,
        entry.time.format("%d/%b/%Y:%H:%M:%S +0000"),
        entry.method,
        entry.path,
        entry.status,
        entry.size,
        entry.user_agent.unwrap_or("-"),
    )
}

/// Pick the client address: first hop of `X-Forwarded-For`, else the peer
/// address, else loopback.
pub fn client_ip<'a>(forwarded_for: Option<&'a str>, peer: Option<&'a str>) -> &'a str {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(peer)
        .unwrap_or("127.0.0.1")
}
