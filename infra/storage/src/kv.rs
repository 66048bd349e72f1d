use crate::error::StorageError;
use async_trait::async_trait;

/// Byte-oriented key-value capability shared by every storage engine.
///
/// Keys are flat strings (no path separators). [`keys`](KeyValueStore::keys) returns
/// matching keys in ascending order.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored bytes, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Lists every key starting with `prefix`.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}
