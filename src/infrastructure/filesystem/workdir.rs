use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::debug;

use crate::common::error::NeoxError;
use crate::common::result::NeoxResult;
use crate::domain::value_objects::exclude_path::ExcludePath;

/// Name of the git metadata entry inside a working tree
pub const VCS_METADATA_NAME: &str = ".git";

const STAGING_SUFFIX: &str = ".neox-staging";

fn fs_error(message: &str, path: &Path, source: std::io::Error) -> NeoxError {
    NeoxError::filesystem_error_with_source(
        format!("{}: {}", message, path.display()),
        Some(path.to_path_buf()),
        source,
    )
}

/// Remove a file, symlink or directory tree; returns whether anything was removed
pub async fn remove_path_if_exists(path: &Path) -> NeoxResult<bool> {
    let metadata = match async_fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(fs_error("Failed to inspect path", path, e)),
    };

    let result = if metadata.is_dir() {
        async_fs::remove_dir_all(path).await
    } else {
        async_fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(fs_error("Failed to remove path", path, e)),
    }
}

/// Check that every directory leading to `exclude` is a real directory under `root`
///
/// Returns `Ok(false)` when a parent is missing or is not a directory.
/// A symlinked parent is an error; nothing is deleted through it.
async fn parents_inside_root(root: &Path, exclude: &ExcludePath) -> NeoxResult<bool> {
    let components: Vec<_> = exclude.as_path().components().collect();
    let parents = components.len().saturating_sub(1);

    let mut current = root.to_path_buf();
    for component in &components[..parents] {
        current.push(component);
        match async_fs::symlink_metadata(&current).await {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(NeoxError::filesystem_error(
                    format!(
                        "Exclude path '{}' goes through a symlinked directory: {}",
                        exclude,
                        current.display()
                    ),
                    Some(current),
                ));
            }
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(fs_error("Failed to inspect path", &current, e)),
        }
    }
    Ok(true)
}

/// Delete the configured exclude paths below `root`
///
/// Entries that do not exist are skipped. An exclude whose last component is
/// a symlink removes the link only. Returns the paths actually removed.
pub async fn remove_excluded(root: &Path, excludes: &[ExcludePath]) -> NeoxResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for exclude in excludes {
        let target = exclude.resolve(root);
        if parents_inside_root(root, exclude).await? && remove_path_if_exists(&target).await? {
            debug!("Removed excluded path {}", target.display());
            removed.push(target);
        } else {
            debug!("Excluded path not present: {}", target.display());
        }
    }
    Ok(removed)
}

/// Remove the `.git` directory (or gitfile) so the tree is no longer a repository
pub async fn strip_vcs_metadata(root: &Path) -> NeoxResult<bool> {
    remove_path_if_exists(&root.join(VCS_METADATA_NAME)).await
}

/// Sibling directory used to build a fresh copy before swapping it in
///
/// `shared/lib` becomes `shared/.lib.neox-staging`.
pub fn staging_path_for(out_path: &Path) -> PathBuf {
    let name = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let staging_name = format!(".{}{}", name, STAGING_SUFFIX);
    match out_path.parent() {
        Some(parent) => parent.join(staging_name),
        None => PathBuf::from(staging_name),
    }
}

/// Replace `target` with the contents of `staging`
///
/// The old target is removed only after the staging tree is complete.
pub async fn replace_dir(staging: &Path, target: &Path) -> NeoxResult<()> {
    remove_path_if_exists(target).await?;
    async_fs::rename(staging, target)
        .await
        .map_err(|e| fs_error("Failed to move staged directory into place", target, e))
}
