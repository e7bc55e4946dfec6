//! Filesystem helpers shared by the staging operations.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{StageError, StageResult};

/// True if the path exists. Errors probing the path count as absent.
pub(crate) async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Copy a single file, creating the destination directory if needed.
pub(crate) async fn copy_file(from: &Path, to: &Path) -> StageResult<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StageError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    tokio::fs::copy(from, to)
        .await
        .map_err(|e| StageError::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

/// Recursively copy a directory tree.
///
/// `to` is created if missing; existing files inside it are overwritten.
/// Blocking; call from a blocking task.
pub(crate) fn copy_dir_recursive(from: &Path, to: &Path) -> StageResult<usize> {
    fs::create_dir_all(to).map_err(|e| StageError::CreateDirectoryFailed {
        path: to.to_path_buf(),
        source: e,
    })?;

    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(from, e))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| StageError::InvalidPath(entry.path().display().to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| StageError::CreateDirectoryFailed {
                path: target.clone(),
                source: e,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| StageError::CopyFailed {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source: e,
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Convert a directory walk failure into a read error.
pub(crate) fn walk_error(root: &Path, e: walkdir::Error) -> StageError {
    let path = e
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    StageError::ReadFailed {
        path,
        source: e.into(),
    }
}
