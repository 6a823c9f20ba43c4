//! File access service: path confinement, directory listing, byte streaming.
//!
//! Every path that reaches the filesystem goes through [`FileAccess`], which
//! confines it to the configured root. Requests are independent and carry no
//! shared mutable state; there is deliberately no cache, each call reads the
//! filesystem directly so results are always fresh.

pub mod listing;
pub mod resolve;
pub mod stream;

use std::path::{Path, PathBuf};

use tokio::fs;

pub use listing::{Entry, Listing};

use crate::vpath;

/// Errors from the file access service.
///
/// All variants surface to API callers as a structured `400`; none of them
/// crash the service.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// The virtual path escapes the served root. Never auto-corrected.
    #[error("path traversal detected")]
    PathTraversal,

    #[error("not found")]
    NotFound,

    /// The path exists but is not a directory.
    #[error("not a directory")]
    NotADirectory,

    /// The path exists but is not a regular file.
    #[error("not a file")]
    NotAFile,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map an I/O error, folding missing paths into the service taxonomy.
pub(crate) fn io_to_fs(err: std::io::Error) -> FsError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound
    } else {
        FsError::Io(err)
    }
}

/// Confined access to one served root directory.
#[derive(Debug, Clone)]
pub struct FileAccess {
    root: PathBuf,
}

impl FileAccess {
    /// Create a service over `root`. The root must already be canonical
    /// (callers canonicalize the CLI path at startup).
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The absolute configured root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a virtual path to a confined absolute path.
    pub async fn resolve(&self, vpath: &str) -> Result<PathBuf, FsError> {
        resolve::resolve(&self.root, vpath).await
    }

    /// Produce a sorted snapshot of a directory's immediate children.
    pub async fn list(&self, virtual_path: &str) -> Result<Listing, FsError> {
        let abs = self.resolve(virtual_path).await?;
        let entries = listing::list(&abs).await?;
        Ok(Listing::new(vpath::normalize(virtual_path), entries))
    }

    /// Resolve a virtual path to a confined regular file, returning its
    /// absolute path and size. Directories yield [`FsError::NotAFile`].
    pub async fn file_meta(&self, virtual_path: &str) -> Result<(PathBuf, u64), FsError> {
        let abs = self.resolve(virtual_path).await?;
        let meta = fs::metadata(&abs).await.map_err(io_to_fs)?;
        if !meta.is_file() {
            return Err(FsError::NotAFile);
        }
        Ok((abs, meta.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileAccess) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let mut f = File::create(dir.path().join("docs/readme.txt")).unwrap();
        f.write_all(b"hello").unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, FileAccess::new(root))
    }

    #[tokio::test]
    async fn list_returns_normalized_virtual_path() {
        let (_dir, access) = setup();
        let listing = access.list("/docs/").await.unwrap();
        assert_eq!(listing.path, "/docs");
        assert_eq!(listing.root, "/");
        assert_eq!(listing.entries.len(), 1);
    }

    #[tokio::test]
    async fn file_meta_rejects_directories() {
        let (_dir, access) = setup();
        let err = access.file_meta("/docs").await.unwrap_err();
        assert!(matches!(err, FsError::NotAFile));
    }

    #[tokio::test]
    async fn file_meta_returns_size() {
        let (_dir, access) = setup();
        let (abs, size) = access.file_meta("/docs/readme.txt").await.unwrap();
        assert_eq!(size, 5);
        assert!(abs.ends_with("docs/readme.txt"));
    }

    #[tokio::test]
    async fn missing_paths_are_not_found() {
        let (_dir, access) = setup();
        assert!(matches!(access.list("/nope").await.unwrap_err(), FsError::NotFound));
        assert!(matches!(
            access.file_meta("/docs/nope.txt").await.unwrap_err(),
            FsError::NotFound
        ));
    }
}
