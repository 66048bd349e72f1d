use crate::error::StorageError;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Infix of in-flight write files: `<key>.orgdirtmp.<pid>.<counter>`.
pub(crate) const TMP_MARKER: &str = ".orgdirtmp.";

const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temporary files older than five minutes and prunes empty shard directories.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => error!(error = %e, "Temp file cleanup task panicked"),
        _ => {},
    }
}

/// Collects the committed keys under `dir` that start with `prefix`, sorted.
///
/// A missing `dir` or an entry removed mid-walk is not an error; any other failure
/// to read the tree is reported rather than silently shrinking the listing.
pub(crate) fn collect_keys(dir: &Path, prefix: &str) -> Result<Vec<String>, StorageError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {},
        Ok(_) => {
            return Err(StorageError::Io {
                source: io::Error::new(io::ErrorKind::NotADirectory, "namespace is not a directory"),
                context: Some(format!("Key listing failed: {}", dir.display()).into()),
            });
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StorageError::Io {
                source: e,
                context: Some(format!("Key listing failed: {}", dir.display()).into()),
            });
        },
    }

    let mut keys = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound) => {
                continue;
            },
            Err(e) => {
                let context = match e.path() {
                    Some(path) => format!("Key listing failed: {}", path.display()),
                    None => format!("Key listing failed: {}", dir.display()),
                };
                return Err(StorageError::Io { source: e.into(), context: Some(context.into()) });
            },
        };

        if !entry.file_type().is_file() || is_tmp(&entry) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str().filter(|name| name.starts_with(prefix)) {
            keys.push(name.to_owned());
        }
    }

    keys.sort_unstable();
    keys.dedup();
    Ok(keys)
}

/// Temp file beside `target`: `<key>.orgdirtmp.<pid>.<counter>`.
pub(crate) fn tmp_path(target: &Path, counter: u64) -> PathBuf {
    let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
    target.with_file_name(format!("{name}{TMP_MARKER}{}.{counter}", std::process::id()))
}

fn remove_stale(root: &Path, now: SystemTime) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }

        if entry.file_type().is_dir() {
            // Only succeeds for empty directories.
            let _ = std::fs::remove_dir(path);
        } else if is_tmp(&entry) && is_stale(&entry, now) {
            match std::fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
                    failed += 1;
                },
            }
        }
    }

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
