use crate::engine::{Compression, Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct StorageConfig {
    compression: Compression,
    create: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Type-state builder: [`connect`](StorageBuilder::connect) exists only once a root is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StorageBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StorageConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> StorageBuilder<S> {
    #[must_use]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Whether a missing root directory is created on connect. Defaults to `true`.
    #[must_use]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }
}

impl StorageBuilder<NoRoot> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(self, path: impl Into<PathBuf>) -> StorageBuilder<WithRoot> {
        StorageBuilder { state: WithRoot(path.into()), config: self.config }
    }
}

impl StorageBuilder<WithRoot> {
    /// Prepares the root and returns the engine handle.
    ///
    /// The root is created when allowed, canonicalized so symlinks cannot move the
    /// sandbox, and swept for temporary files abandoned by interrupted writes. A failed
    /// sweep is logged and does not abort the connection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the root is missing and `create(false)` was set,
    /// or when it cannot be created or resolved.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap storage root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve storage root: {}", root.display()))?;
        info!(path = %canonical.display(), compression = ?self.config.compression, "Storage root ready");

        let storage = Storage {
            inner: Arc::new(StorageInner {
                root: canonical,
                compression: self.config.compression,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        storage.purge_tmp().await;

        Ok(storage)
    }
}
