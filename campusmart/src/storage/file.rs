//! Directory-backed storage.
//!
//! Each key is one file, `<key>.json`, holding the raw value, with the key
//! percent-encoded into a safe file name. Keys stored with a TTL get a sibling
//! `<key>.expires` holding an RFC 3339 deadline. Writes go to a `.tmp` file
//! first and are renamed into place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use super::traits::Storage;
use crate::error::{Error, Result};

const VALUE_EXT: &str = "json";
const EXPIRY_EXT: &str = "expires";
const TMP_EXT: &str = "tmp";

/// Storage that survives restarts by writing files under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str, ext: &str) -> PathBuf {
        self.root.join(format!("{}.{}", urlencoding::encode(key), ext))
    }

    async fn expired(&self, key: &str) -> Result<bool> {
        let raw = match fs::read_to_string(self.path_for(key, EXPIRY_EXT)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(deadline) => Ok(Utc::now() > deadline.with_timezone(&Utc)),
            Err(e) => {
                warn!("ignoring malformed expiry for {}: {}", key, e);
                Ok(false)
            }
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            // Matched on the name rather than `Path::extension`, which is
            // `None` for `.json` (the empty key).
            let Some(encoded) = name
                .to_str()
                .and_then(|n| n.strip_suffix(VALUE_EXT))
                .and_then(|n| n.strip_suffix('.'))
            else {
                continue;
            };
            match urlencoding::decode(encoded) {
                Ok(key) => keys.push(key.into_owned()),
                Err(e) => warn!("skipping undecodable file name {:?}: {}", name, e),
            }
        }
        Ok(keys)
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write `data` next to `path` and rename it over `path`, so readers see the
/// old contents or the new ones, never a partial file.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".");
    tmp.push(TMP_EXT);
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        remove_if_present(&tmp).await?;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.expired(key).await? {
            debug!("{} expired", key);
            return Ok(None);
        }
        match fs::read(self.path_for(key, VALUE_EXT)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        fs::create_dir_all(&self.root).await?;

        let value_path = self.path_for(key, VALUE_EXT);
        let expiry_path = self.path_for(key, EXPIRY_EXT);
        match ttl {
            // Deadline before value: a value is never visible without its deadline.
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| Error::Storage(format!("ttl out of range: {}", e)))?;
                write_atomic(&expiry_path, (Utc::now() + ttl).to_rfc3339().as_bytes()).await?;
                write_atomic(&value_path, value).await
            }
            // Value before dropping the deadline: a failure leaves it expiring early.
            None => {
                write_atomic(&value_path, value).await?;
                remove_if_present(&expiry_path).await
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        remove_if_present(&self.path_for(key, VALUE_EXT)).await?;
        remove_if_present(&self.path_for(key, EXPIRY_EXT)).await
    }

    async fn clear(&self) -> Result<()> {
        for key in self.list_keys().await? {
            self.remove(&key).await?;
        }
        Ok(())
    }
}
