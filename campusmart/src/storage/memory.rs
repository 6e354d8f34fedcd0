//! In-memory storage implementation.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::RwLock,
    time::{Duration, Instant},
};

use super::traits::Storage;
use crate::error::{Error, Result};

/// In-memory storage with optional TTL support. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Entry>>,
}

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |e| Instant::now() > e)
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("memory storage lock poisoned".into())
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(key).and_then(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.data.clone())
            }
        }))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        // Expired entries are dropped on write.
        data.retain(|_, v| !v.is_expired());
        data.insert(key.to_owned(), Entry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.clear();
        Ok(())
    }
}
