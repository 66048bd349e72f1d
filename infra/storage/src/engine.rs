//! Filesystem engine: sandboxed root, atomic writes and transparent compression.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::namespace::{NamespaceName, NamespacedStorage};
use crate::security;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const MAX_TMP_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

#[derive(Debug)]
pub struct StorageInner {
    /// Canonical physical root; every resolved path must stay below it.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    pub(crate) tmp_counter: AtomicU64,
}

/// Cheaply clonable handle to a filesystem root.
///
/// Data is addressed through [`NamespacedStorage`] views obtained from
/// [`namespace`](Storage::namespace).
///
/// ```rust
/// use orgdir_storage::{Compression, KeyValueStore, Storage, StorageError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let storage = Storage::builder()
///         .root(tmp.path().join("data"))
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     let entities = storage.namespace("entities")?;
///     entities.set("entity-11222333000181", b"{}").await?;
///     assert_eq!(entities.keys("entity-").await?, vec!["entity-11222333000181"]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Returns a view scoped to `name`.
    ///
    /// Names are lowercased and must be non-empty ASCII alphanumerics or underscores.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] for an empty or illegal name.
    pub fn namespace<N>(&self, name: N) -> Result<NamespacedStorage, StorageError>
    where
        N: TryInto<NamespaceName, Error = StorageError>,
    {
        let ns = name.try_into()?;
        Ok(NamespacedStorage::new(self.clone(), ns))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub(crate) async fn read_key(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let resolved = security::resolve_key(&self.root, namespace, key)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound {
                    message: resolved.display().to_string().into(),
                    context: None,
                });
            },
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", resolved.display()).into()),
                });
            },
        };

        self.compression.decompress(data)
    }

    /// Writes through a unique temp file, `fsync`s it and renames it over the target,
    /// so readers never observe a partial value.
    pub(crate) async fn write_key(
        &self,
        namespace: &str,
        key: &str,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let resolved = security::resolve_key(&self.root, namespace, key)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", resolved.display()))?;
            // Re-check now that the shard chain exists on disk.
            security::confine(&self.root, parent)?;
        }

        let payload = self.compression.compress(data);
        let (temp, mut file) = self.create_temp(&resolved).await?;

        let written = async {
            file.write_all(&payload).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")
        }
        .await;
        drop(file);
        if let Err(err) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(err);
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), resolved.display())
                        .into(),
                ),
            });
        }

        if let Some(parent) = resolved.parent() {
            sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), "File saved atomically");
        Ok(())
    }

    pub(crate) async fn list_keys(
        &self,
        namespace: &str,
        prefix: &str,
    ) -> Result<Vec<String>, StorageError> {
        let dir = self.root.join(namespace);
        let prefix = prefix.to_owned();
        tokio::task::spawn_blocking(move || maintenance::collect_keys(&dir, &prefix))
            .await
            .context("Key listing task failed")?
    }

    /// Opens a fresh temp file beside `target`, skipping names left behind by
    /// earlier writers.
    async fn create_temp(&self, target: &Path) -> Result<(PathBuf, fs::File), StorageError> {
        let mut attempts = 0;
        loop {
            let temp = maintenance::tmp_path(target, self.tmp_counter.fetch_add(1, Ordering::Relaxed));
            match fs::OpenOptions::new().create_new(true).write(true).open(&temp).await {
                Ok(file) => return Ok((temp, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists && attempts < MAX_TMP_ATTEMPTS => {
                    debug!(path = %temp.display(), "Temp name taken, retrying");
                    attempts += 1;
                },
                Err(err) => {
                    return Err(StorageError::Io {
                        source: err,
                        context: Some(format!("Temp creation failed: {}", temp.display()).into()),
                    });
                },
            }
        }
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}
