//! Byte streaming: range resolution and bounded file slices.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};

use super::{io_to_fs, FsError};

/// Largest slice served for an open-ended or malformed range request.
///
/// Caps how much a single request window can force off disk, which keeps
/// video scrubbing cheap without the client having to know the file size.
pub const DEFAULT_CHUNK: u64 = 1_000_000;

/// An inclusive byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Resolve an optional `Range` header against a file of `size` bytes.
///
/// `None` means the whole file is served with `200`. Malformed syntax and
/// out-of-bounds starts fall back to the default bounded chunk from offset
/// zero instead of failing the request; empty files are always served whole.
pub fn resolve_range(header: Option<&str>, size: u64) -> Option<ByteRange> {
    let header = header?;
    if size == 0 {
        return None;
    }
    let fallback = ByteRange { start: 0, end: DEFAULT_CHUNK.min(size - 1) };

    let Some(ranges) = header.trim().strip_prefix("bytes=") else {
        return Some(fallback);
    };
    let Some((start_str, end_str)) = ranges.split_once('-') else {
        return Some(fallback);
    };
    let Ok(start) = start_str.trim().parse::<u64>() else {
        return Some(fallback);
    };
    if start >= size {
        return Some(fallback);
    }
    let end = match end_str.trim() {
        "" => (start + DEFAULT_CHUNK).min(size - 1),
        s => match s.parse::<u64>() {
            Ok(end) => end.min(size - 1),
            Err(_) => return Some(fallback),
        },
    };
    if end < start {
        return Some(fallback);
    }
    Some(ByteRange { start, end })
}

/// Open a confined file positioned at `range.start`, limited to the range
/// length.
pub async fn open_slice(abs: &Path, range: ByteRange) -> Result<Take<File>, FsError> {
    let mut file = File::open(abs).await.map_err(io_to_fs)?;
    file.seek(SeekFrom::Start(range.start)).await?;
    Ok(file.take(range.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn no_header_serves_whole_file() {
        assert_eq!(resolve_range(None, 10), None);
    }

    #[test]
    fn explicit_range_is_honored() {
        let r = resolve_range(Some("bytes=10-19"), 100).unwrap();
        assert_eq!(r, ByteRange { start: 10, end: 19 });
        assert_eq!(r.len(), 10);
    }

    #[test]
    fn open_ended_range_is_capped_to_default_chunk() {
        let size = 5_000_000;
        let r = resolve_range(Some("bytes=0-"), size).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: DEFAULT_CHUNK });
        assert_eq!(r.len(), DEFAULT_CHUNK + 1);

        let r = resolve_range(Some("bytes=2000000-"), size).unwrap();
        assert_eq!(r, ByteRange { start: 2_000_000, end: 3_000_000 });
    }

    #[test]
    fn open_ended_range_on_small_file_covers_it() {
        let r = resolve_range(Some("bytes=0-"), 5).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: 4 });
        assert_eq!(r.len(), 5);
    }

    #[test]
    fn end_is_clamped_to_file_size() {
        let r = resolve_range(Some("bytes=3-999"), 10).unwrap();
        assert_eq!(r, ByteRange { start: 3, end: 9 });
    }

    #[test]
    fn malformed_ranges_fall_back_to_default_chunk() {
        for header in ["bytes=abc-", "bytes=-500", "items=0-1", "bytes=5", "bytes=9-2,4-5"] {
            let r = resolve_range(Some(header), 50).unwrap();
            assert_eq!(r, ByteRange { start: 0, end: 49 }, "header {header}");
        }
    }

    #[test]
    fn start_past_end_of_file_falls_back() {
        let r = resolve_range(Some("bytes=100-"), 50).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: 49 });
    }

    #[test]
    fn inverted_range_falls_back() {
        let r = resolve_range(Some("bytes=9-2"), 50).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: 49 });
    }

    #[test]
    fn empty_file_is_served_whole() {
        assert_eq!(resolve_range(Some("bytes=0-"), 0), None);
    }

    #[tokio::test]
    async fn open_slice_reads_only_the_range() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"hello world").unwrap();
        let mut reader =
            open_slice(tmp.path(), ByteRange { start: 6, end: 10 }).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"world");
    }

    #[tokio::test]
    async fn open_slice_missing_file_is_not_found() {
        let err = open_slice(Path::new("/no/such/file"), ByteRange { start: 0, end: 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound));
    }
}
