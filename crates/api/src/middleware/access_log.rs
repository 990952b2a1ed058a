//! Access-log writer feeding the Blue Trinity monitor.
//!
//! Every response appends one Common Log Format line. Write failures are
//! logged and never affect the response.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use std::convert::Infallible;

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::header::{CONTENT_LENGTH, USER_AGENT};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use trinity_core::access_log::{client_ip, format_common_log, AccessLogEntry};

/// Append-only handle to the access log.
#[derive(Debug)]
pub struct AccessLogWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl AccessLogWriter {
    /// Open (creating if needed) the log for appending.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line (a trailing newline is added).
    pub async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await
    }
}

/// Client address as the access log records it: first `X-Forwarded-For`
/// hop, else the peer address, else loopback.
pub fn request_client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    let forwarded_for = header_string(headers.get("x-forwarded-for"));
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    client_ip(forwarded_for.as_deref(), peer.as_deref()).to_string()
}

/// Extractor for [`request_client_ip`], so sessions and the access log
/// agree on who made a request.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(request_client_ip(&parts.headers, &parts.extensions)))
    }
}

/// Middleware recording every request/response pair.
pub async fn record_access(
    State(writer): State<Arc<AccessLogWriter>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let client = request_client_ip(request.headers(), request.extensions());
    let user_agent = header_string(request.headers().get(USER_AGENT));

    let response = next.run(request).await;

    let size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let line = format_common_log(&AccessLogEntry {
        client_ip: &client,
        time: Utc::now(),
        method: &method,
        path: &path,
        status: response.status().as_u16(),
        size,
        user_agent: user_agent.as_deref(),
    });

    if let Err(e) = writer.append(&line).await {
        tracing::warn!(error = %e, path = %writer.path().display(), "Failed to write access log");
    }

    response
}

fn header_string(value: Option<&axum::http::HeaderValue>) -> Option<String> {
    value.and_then(|v| v.to_str().ok()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_lines_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/access.log");

        let writer = AccessLogWriter::open(&path).await.unwrap();
        writer.append("first").await.unwrap();
        writer.append("second").await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn client_ip_prefers_forwarded_header_over_peer() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 4000))));

        let mut headers = HeaderMap::new();
        assert_eq!(request_client_ip(&headers, &extensions), "10.1.2.3");

        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(request_client_ip(&headers, &extensions), "203.0.113.9");

        assert_eq!(request_client_ip(&HeaderMap::new(), &Extensions::new()), "127.0.0.1");
    }

    #[tokio::test]
    async fn reopening_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        AccessLogWriter::open(&path).await.unwrap().append("a").await.unwrap();
        AccessLogWriter::open(&path).await.unwrap().append("b").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "a\nb\n");
    }
}
