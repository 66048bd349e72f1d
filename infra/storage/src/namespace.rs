use crate::engine::Storage;
use crate::error::StorageError;
use crate::kv::KeyValueStore;
use crate::security;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(pub String);

impl TryFrom<String> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_lowercase();

        if name.is_empty() {
            return Err(StorageError::PathTraversalAttempt {
                message: "EMPTY".into(),
                context: Some("Namespace cannot be empty".into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::PathTraversalAttempt {
                message: name.into(),
                context: Some("Namespace contains illegal characters".into()),
            });
        }

        Ok(Self(name))
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filesystem-backed [`KeyValueStore`] scoped to one namespace directory.
///
/// Each key is a file, sharded by a hash of its name. Clones share the
/// underlying engine.
#[derive(Debug, Clone)]
pub struct NamespacedStorage {
    storage: Storage,
    namespace: Arc<str>,
}

impl NamespacedStorage {
    pub(crate) fn new(storage: Storage, namespace: NamespaceName) -> Self {
        Self { storage, namespace: namespace.0.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.namespace
    }

    /// Physical location of `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] or [`StorageError::PathTraversalAttempt`] for
    /// keys that cannot be stored safely.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        security::resolve_key(self.storage.root(), &self.namespace, key)
    }
}

#[async_trait]
impl KeyValueStore for NamespacedStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self.storage.read_key(&self.namespace, key).await {
            Ok(data) => Ok(Some(data)),
            Err(StorageError::FileNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.storage.write_key(&self.namespace, key, value).await
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.storage.list_keys(&self.namespace, prefix).await
    }

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Metadata read failed: {}", path.display()).into()),
            }),
        }
    }
}
