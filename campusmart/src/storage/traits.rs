//! Storage trait definitions.

use async_trait::async_trait;
use log::warn;
use std::time::Duration;

use crate::error::Result;

/// Trait for key-value persistence backends.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Get a value by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value with optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Remove a value by key.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Clear all stored values.
    async fn clear(&self) -> Result<()>;
}

/// Extension trait for storage with typed operations.
#[async_trait]
pub trait StorageExt: Storage {
    /// Get a JSON-deserialized value.
    ///
    /// A value that no longer decodes is treated as absent, since stored
    /// shapes carry no version.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        let Some(data) = self.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&data) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("discarding undecodable value under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Set a JSON-serialized value.
    async fn set_json<T: serde::Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.set(key, &data, ttl).await
    }
}

// Blanket implementation
impl<T: Storage + ?Sized> StorageExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestData {
        value: String,
    }

    #[tokio::test]
    async fn test_storage_ext() {
        let storage = MemoryStorage::new();
        let key = "test";
        let value = TestData {
            value: "hello".into(),
        };

        storage.set_json(key, &value, None).await.unwrap();
        let result: Option<TestData> = storage.get_json(key).await.unwrap();
        assert_eq!(result, Some(value));
    }

    #[tokio::test]
    async fn test_undecodable_value_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set("test", b"{\"other\": 1}", None).await.unwrap();
        let result: Option<TestData> = storage.get_json("test").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ext_through_trait_object() {
        let storage: std::sync::Arc<dyn Storage> = std::sync::Arc::new(MemoryStorage::new());
        storage.set_json("n", &5u32, None).await.unwrap();
        assert_eq!(storage.get_json::<u32>("n").await.unwrap(), Some(5));
    }
}
