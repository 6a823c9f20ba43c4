//! Cache-less fetch client: every listing and preview request reaches the
//! filesystem directly, so results are always fresh. Each request runs as a
//! spawned task and reports back through the event channel; completions may
//! arrive in any order relative to each other and to new user commands; the
//! navigation controller reconciles them.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;
use crate::fs::{stream, FileAccess, FsError};
use crate::nav::PreviewContent;

#[derive(Clone)]
pub struct Fetcher {
    access: Arc<FileAccess>,
    tx: UnboundedSender<Event>,
    preview_head_bytes: u64,
}

impl Fetcher {
    pub fn new(access: Arc<FileAccess>, tx: UnboundedSender<Event>, preview_head_bytes: u64) -> Self {
        Self { access, tx, preview_head_bytes }
    }

    /// Fetch a listing for the left pane.
    pub fn fetch_left(&self, path: String) {
        let access = self.access.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = access.list(&path).await;
            let _ = tx.send(Event::LeftListing(result));
        });
    }

    /// Fetch a listing for the right pane.
    pub fn fetch_right(&self, path: String) {
        let access = self.access.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = access.list(&path).await;
            let _ = tx.send(Event::RightListing { path, result });
        });
    }

    /// Schedule the minimum-visible-loading completion for a settling target.
    pub fn schedule_settle(&self, target: String, delay: Duration) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::Settle { target });
        });
    }

    /// Load the head slice of a file for the preview column.
    pub fn fetch_preview(&self, path: String) {
        let access = self.access.clone();
        let tx = self.tx.clone();
        let head = self.preview_head_bytes;
        tokio::spawn(async move {
            let content = load_preview(&access, &path, head).await.ok();
            let _ = tx.send(Event::Preview { path, content });
        });
    }
}

/// Read up to `head` bytes from the start of a confined file and classify
/// them as text or binary.
async fn load_preview(
    access: &FileAccess,
    path: &str,
    head: u64,
) -> Result<PreviewContent, FsError> {
    let (abs, size) = access.file_meta(path).await?;
    if size == 0 {
        return Ok(PreviewContent::Text(String::new()));
    }
    let range = stream::ByteRange { start: 0, end: head.max(1).min(size) - 1 };
    let mut reader = stream::open_slice(&abs, range).await?;
    let mut buf = Vec::with_capacity(range.len() as usize);
    reader.read_to_end(&mut buf).await?;
    if matches!(content_inspector::inspect(&buf), content_inspector::ContentType::BINARY) {
        Ok(PreviewContent::Binary { size })
    } else {
        Ok(PreviewContent::Text(String::from_utf8_lossy(&buf).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<FileAccess>) {
        let dir = TempDir::new().unwrap();
        let mut f = std::fs::File::create(dir.path().join("hello.txt")).unwrap();
        f.write_all(b"hello preview").unwrap();
        let mut f = std::fs::File::create(dir.path().join("blob.bin")).unwrap();
        f.write_all(&[0u8, 159, 146, 150, 0, 1, 2]).unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, Arc::new(FileAccess::new(root)))
    }

    #[tokio::test]
    async fn text_files_preview_as_text() {
        let (_dir, access) = setup();
        let content = load_preview(&access, "/hello.txt", 64).await.unwrap();
        assert_eq!(content, PreviewContent::Text("hello preview".into()));
    }

    #[tokio::test]
    async fn preview_is_limited_to_the_head() {
        let (_dir, access) = setup();
        let content = load_preview(&access, "/hello.txt", 5).await.unwrap();
        assert_eq!(content, PreviewContent::Text("hello".into()));
    }

    #[tokio::test]
    async fn binary_files_preview_as_binary() {
        let (_dir, access) = setup();
        let content = load_preview(&access, "/blob.bin", 64).await.unwrap();
        assert_eq!(content, PreviewContent::Binary { size: 7 });
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let (_dir, access) = setup();
        assert!(load_preview(&access, "/gone.txt", 64).await.is_err());
    }

    #[tokio::test]
    async fn empty_file_previews_as_empty_text() {
        let (dir, access) = setup();
        std::fs::File::create(dir.path().join("empty")).unwrap();
        let content = load_preview(&access, "/empty", 64).await.unwrap();
        assert_eq!(content, PreviewContent::Text(String::new()));
    }
}
