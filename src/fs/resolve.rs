//! Path resolver: the security boundary between virtual paths and the
//! filesystem. Every other component trusts its output.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

use super::{io_to_fs, FsError};

/// Resolve a virtual path against a canonical `root`.
///
/// The single leading separator is stripped, the remainder is screened
/// lexically (parent jumps and absolute overrides are refused outright, even
/// for paths that do not exist), and the joined path is canonicalized so a
/// symlink pointing outside the root cannot slip through.
pub async fn resolve(root: &Path, virtual_path: &str) -> Result<PathBuf, FsError> {
    let rel = virtual_path.strip_prefix('/').unwrap_or(virtual_path);
    let rel = Path::new(rel);

    for component in rel.components() {
        match component {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FsError::PathTraversal);
            }
            Component::Normal(_) | Component::CurDir => {}
        }
    }

    let canonical = fs::canonicalize(root.join(rel)).await.map_err(io_to_fs)?;
    if !canonical.starts_with(root) {
        return Err(FsError::PathTraversal);
    }
    Ok(canonical)
}
