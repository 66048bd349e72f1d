use crate::error::StorageError;
use crate::kv::KeyValueStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local engine. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey { message: "EMPTY".into(), context: None });
        }
        self.entries.write().await.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.read().await.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefix_listing_is_sorted_and_bounded() {
        let store = MemoryStore::new();
        store.set("entity-2", b"b").await.unwrap();
        store.set("entity-1", b"a").await.unwrap();
        store.set("other-1", b"c").await.unwrap();

        assert_eq!(store.keys("entity-").await.unwrap(), vec!["entity-1", "entity-2"]);
        assert_eq!(store.keys("").await.unwrap().len(), 3);
        assert!(store.keys("missing-").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_replaces_and_get_reports_absence() {
        let store = MemoryStore::new();
        assert_eq!(store.get("entity-1").await.unwrap(), None);

        store.set("entity-1", b"old").await.unwrap();
        store.set("entity-1", b"new").await.unwrap();

        assert_eq!(store.get("entity-1").await.unwrap().as_deref(), Some(&b"new"[..]));
        assert!(store.contains("entity-1").await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let err = MemoryStore::new().set("", b"x").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
    }
}
