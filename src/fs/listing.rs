//! Directory listings: immutable snapshots of a directory's children.

use std::cmp::Ordering;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tokio::fs;

use super::{io_to_fs, FsError};

/// One child of a directory. Never mutated after creation; its identity is
/// `name` within the parent listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    pub size: u64,
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime: u64,
}

/// A snapshot of one directory. A listing is a value object: it is replaced
/// wholesale by a newer listing, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub root: String,
    /// Normalized virtual path of the listed directory.
    pub path: String,
    pub entries: Vec<Entry>,
}

impl Listing {
    pub fn new(path: String, entries: Vec<Entry>) -> Self {
        Self { root: "/".to_string(), path, entries }
    }
}

/// List the immediate children of a confined directory path.
///
/// Children whose metadata cannot be read (broken symlinks, permission
/// errors) are skipped rather than failing the whole listing.
pub async fn list(abs: &Path) -> Result<Vec<Entry>, FsError> {
    let meta = fs::metadata(abs).await.map_err(io_to_fs)?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory);
    }

    let mut read_dir = fs::read_dir(abs).await.map_err(io_to_fs)?;
    let mut entries = Vec::new();
    while let Some(dirent) = read_dir.next_entry().await.map_err(io_to_fs)? {
        // Follows symlinks, so a link to a directory lists as a directory.
        let meta = match fs::metadata(dirent.path()).await {
            Ok(m) => m,
            Err(_) => continue,
        };
        entries.push(Entry {
            name: dirent.file_name().to_string_lossy().to_string(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            mtime: mtime_millis(&meta),
        });
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// Sort entries: directories before files, then case-insensitive name order
/// with a raw-name tiebreak. The order is total, so repeated listings of an
/// unchanged directory are byte-identical, so selection indices stay stable
/// across refreshes.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });
}

fn mtime_millis(meta: &std::fs::Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("zoo")).unwrap();
        std::fs::create_dir(dir.path().join("Arena")).unwrap();
        let mut f = File::create(dir.path().join("notes.txt")).unwrap();
        f.write_all(b"0123456789").unwrap();
        File::create(dir.path().join("Makefile")).unwrap();
        dir
    }

    #[tokio::test]
    async fn directories_sort_before_files() {
        let dir = setup();
        let entries = list(dir.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Arena", "zoo", "Makefile", "notes.txt"]);
        assert!(entries[0].is_dir && entries[1].is_dir);
        assert!(!entries[2].is_dir && !entries[3].is_dir);
    }

    #[tokio::test]
    async fn repeated_listings_are_identical() {
        let dir = setup();
        let first = list(dir.path()).await.unwrap();
        let second = list(dir.path()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn entry_metadata_is_populated() {
        let dir = setup();
        let entries = list(dir.path()).await.unwrap();
        let notes = entries.iter().find(|e| e.name == "notes.txt").unwrap();
        assert_eq!(notes.size, 10);
        assert!(notes.mtime > 0);
    }

    #[tokio::test]
    async fn listing_a_file_fails() {
        let dir = setup();
        let err = list(&dir.path().join("notes.txt")).await.unwrap_err();
        assert!(matches!(err, FsError::NotADirectory));
    }

    #[tokio::test]
    async fn listing_missing_dir_fails() {
        let dir = setup();
        let err = list(&dir.path().join("gone")).await.unwrap_err();
        assert!(matches!(err, FsError::NotFound));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn broken_symlinks_are_skipped() {
        let dir = setup();
        std::os::unix::fs::symlink(dir.path().join("void"), dir.path().join("dangling")).unwrap();
        let entries = list(dir.path()).await.unwrap();
        assert!(entries.iter().all(|e| e.name != "dangling"));
    }

    #[test]
    fn sort_ties_break_on_raw_name() {
        let mut entries = vec![
            Entry { name: "readme".into(), is_dir: false, size: 0, mtime: 0 },
            Entry { name: "README".into(), is_dir: false, size: 0, mtime: 0 },
        ];
        sort_entries(&mut entries);
        assert_eq!(entries[0].name, "README");
        assert_eq!(entries[1].name, "readme");
    }

    #[test]
    fn entry_serializes_with_wire_names() {
        let entry = Entry { name: "a".into(), is_dir: true, size: 3, mtime: 9 };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isDir"], true);
        assert_eq!(json["mtime"], 9);
    }
}
