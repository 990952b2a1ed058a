//! Incremental reader for a growing log file.
//!
//! [`LogTailer`] remembers a byte offset and returns only the complete lines
//! appended since the previous poll. A trailing fragment without a newline is
//! held back until the rest of it arrives.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::SentinelError;

#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
}

impl LogTailer {
    /// Start at the current end of `path`, so existing content is skipped.
    /// A missing file starts at offset 0.
    pub async fn open_at_end(path: impl AsRef<Path>) -> Result<Self, SentinelError> {
        let path = path.as_ref().to_path_buf();
        let offset = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            offset,
            partial: Vec::new(),
        })
    }

    /// Start at the beginning of `path`.
    pub fn from_start(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: 0,
            partial: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read everything appended since the last poll and return the complete
    /// lines, without their line terminators. Blank lines are dropped.
    pub async fn poll(&mut self) -> Result<Vec<String>, SentinelError> {
        let len = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if len < self.offset {
            tracing::info!(path = %self.path.display(), "Log truncated, reading from start");
            self.offset = 0;
            self.partial.clear();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(self.offset)).await?;
        let mut chunk = Vec::new();
        let read = file.read_to_end(&mut chunk).await?;
        self.offset += read as u64;

        self.partial.extend_from_slice(&chunk);
        Ok(self.drain_lines())
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.partial.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);

        complete
            .split(|b| *b == b'\n')
            .map(|raw| String::from_utf8_lossy(raw).trim_end_matches('\r').to_string())
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}
