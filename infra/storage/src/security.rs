use crate::error::StorageError;
use crate::maintenance::TMP_MARKER;
use std::path::{Path, PathBuf};

/// Rejects keys that could address anything other than a single file in a namespace.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let reason = if key.is_empty() {
        Some("Key cannot be empty")
    } else if key == "." || key == ".." {
        Some("Key cannot be a relative directory marker")
    } else if key.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        Some("Key contains path separators or control characters")
    } else if key.contains(TMP_MARKER) {
        Some("Key collides with the temporary file marker")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some(reason.into()),
        }),
        None => Ok(()),
    }
}

/// Physical path of `key` inside `namespace`: `<root>/<namespace>/<h0>/<h1>/<key>`.
///
/// `h0` and `h1` are the two high bytes of the key's 64-bit Fx hash in hex, so keys
/// sharing a long common prefix still spread over 65536 shard directories.
pub(crate) fn resolve_key(root: &Path, namespace: &str, key: &str) -> Result<PathBuf, StorageError> {
    validate_key(key)?;

    let (outer, inner) = shard(key);
    let mut path = root.join(namespace);
    path.push(outer);
    path.push(inner);
    path.push(key);

    confine(root, &path)?;
    Ok(path)
}

/// Verifies that `path`, or its closest existing ancestor, lives under `root` once
/// symlinks are resolved.
pub(crate) fn confine(root: &Path, path: &Path) -> Result<(), StorageError> {
    if !path.starts_with(root) {
        return Err(escape(path, "Path is outside sandbox boundaries"));
    }

    for ancestor in path.ancestors() {
        if ancestor == root {
            return Ok(());
        }
        match ancestor.canonicalize() {
            Ok(canonical) if canonical.starts_with(root) => return Ok(()),
            Ok(_) => return Err(escape(ancestor, "Existing path resolves outside sandbox")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => {
                return Err(StorageError::Io {
                    source: e,
                    context: Some(format!("Failed to verify {}", ancestor.display()).into()),
                });
            },
        }
    }

    Err(escape(path, "No valid parent directory found within sandbox"))
}

fn shard(key: &str) -> (String, String) {
    let [outer, inner, ..] = fxhash::hash64(key.as_bytes()).to_be_bytes();
    (format!("{outer:02x}"), format!("{inner:02x}"))
}

fn escape(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}
