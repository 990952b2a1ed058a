//! Persistent record of detected attacks.
//!
//! `blacklist.txt` starts with a comment header and then holds one JSON
//! [`SecurityAlert`] per line. The same `(kind, ip, path)` is recorded once.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use trinity_core::detection::{AlertKind, SecurityAlert};

use crate::error::SentinelError;

pub const HEADER: &str = "# Blue Trinity blacklist";

type EntryKey = (AlertKind, Option<String>, Option<String>);

fn key_of(alert: &SecurityAlert) -> EntryKey {
    (alert.kind, alert.ip.clone(), alert.path.clone())
}

/// Append-side handle; owns the dedup index.
#[derive(Debug)]
pub struct Blacklist {
    path: PathBuf,
    seen: HashSet<EntryKey>,
}

impl Blacklist {
    /// Open the blacklist, creating it (with header) if it does not exist,
    /// and index the entries already recorded.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SentinelError> {
        let path = path.as_ref().to_path_buf();
        ensure_file(&path).await?;
        let seen = read_entries(&path).await?.iter().map(key_of).collect();
        Ok(Self { path, seen })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Append `alert` unless an entry with the same kind, ip and path exists.
    /// Returns whether it was written.
    pub async fn record(&mut self, alert: &SecurityAlert) -> Result<bool, SentinelError> {
        let key = key_of(alert);
        if self.seen.contains(&key) {
            return Ok(false);
        }

        let mut line = serde_json::to_string(alert)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        self.seen.insert(key);
        Ok(true)
    }
}

/// Create the blacklist with its header if it does not exist yet.
pub async fn ensure_file(path: &Path) -> Result<(), SentinelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(mut file) => {
            file.write_all(format!("{HEADER}\n").as_bytes()).await?;
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Every parseable entry, oldest first. Comments, blank and malformed lines
/// are skipped. A missing file has no entries.
pub async fn read_entries(path: &Path) -> Result<Vec<SecurityAlert>, SentinelError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect())
}

/// The last `limit` entries, oldest first.
pub async fn recent(path: &Path, limit: usize) -> Result<Vec<SecurityAlert>, SentinelError> {
    let mut entries = read_entries(path).await?;
    let skip = entries.len().saturating_sub(limit);
    Ok(entries.split_off(skip))
}

/// Number of distinct source addresses on record.
pub async fn distinct_ips(path: &Path) -> Result<usize, SentinelError> {
    Ok(read_entries(path)
        .await?
        .into_iter()
        .filter_map(|a| a.ip)
        .collect::<HashSet<_>>()
        .len())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn alert(kind: AlertKind, ip: &str, path: &str) -> SecurityAlert {
        SecurityAlert {
            time: Utc::now(),
            reason: format!("{kind:?}"),
            ip: Some(ip.into()),
            path: Some(path.into()),
            line: format!("{ip} GET {path}"),
            kind,
        }
    }

    #[tokio::test]
    async fn creates_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/blacklist.txt");
        let list = Blacklist::open(&path).await.unwrap();
        assert!(list.is_empty());

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, format!("{HEADER}\n"));
    }

    #[tokio::test]
    async fn dedups_on_kind_ip_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blacklist.txt");
        let mut list = Blacklist::open(&path).await.unwrap();

        assert!(list.record(&alert(AlertKind::Xss, "1.1.1.1", "/a")).await.unwrap());
        assert!(!list.record(&alert(AlertKind::Xss, "1.1.1.1", "/a")).await.unwrap());
        assert!(list.record(&alert(AlertKind::SqlInjection, "1.1.1.1", "/a")).await.unwrap());
        assert!(list.record(&alert(AlertKind::Xss, "1.1.1.1", "/b")).await.unwrap());
        assert_eq!(list.len(), 3);

        // The index survives a reopen.
        let mut reopened = Blacklist::open(&path).await.unwrap();
        assert!(!reopened.record(&alert(AlertKind::Xss, "1.1.1.1", "/b")).await.unwrap());
        assert_eq!(read_entries(&path).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn recent_and_distinct_ips_skip_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blacklist.txt");
        let mut list = Blacklist::open(&path).await.unwrap();
        list.record(&alert(AlertKind::Xss, "1.1.1.1", "/a")).await.unwrap();
        list.record(&alert(AlertKind::Xss, "2.2.2.2", "/a")).await.unwrap();
        list.record(&alert(AlertKind::Flood, "2.2.2.2", "/z")).await.unwrap();

        let mut file = tokio::fs::OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"not json\n").await.unwrap();

        let last_two = recent(&path, 2).await.unwrap();
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[1].kind, AlertKind::Flood);
        assert_eq!(distinct_ips(&path).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(recent(&path, 10).await.unwrap().is_empty());
        assert_eq!(distinct_ips(&path).await.unwrap(), 0);
    }
}
