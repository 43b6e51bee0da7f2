//! Log file tailing for failure diagnostics.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Backward read granularity.
const CHUNK_SIZE: u64 = 8192;

/// Returns the last `lines` lines of the file at `path`.
///
/// Reads the file backwards in fixed-size chunks, so tailing a large
/// log never loads more than the requested lines' worth of chunks into
/// memory. Returns `None` when the file does not exist or cannot be
/// read, so a missing log never fails the surrounding operation.
#[must_use]
pub fn tail(path: impl AsRef<Path>, lines: usize) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let len = file.seek(SeekFrom::End(0)).ok()?;

    let mut pos = len;
    let mut buf: Vec<u8> = Vec::new();
    let mut newlines = 0usize;

    // Pull chunks from the end until the buffer spans enough line
    // breaks to contain the requested lines, or the file is exhausted.
    while pos > 0 && newlines <= lines {
        let chunk_len = CHUNK_SIZE.min(pos);
        pos -= chunk_len;

        file.seek(SeekFrom::Start(pos)).ok()?;
        let mut chunk = vec![0u8; usize::try_from(chunk_len).ok()?];
        file.read_exact(&mut chunk).ok()?;

        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    let text = String::from_utf8_lossy(&buf);
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    Some(all[start..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tail_missing_file() {
        assert_eq!(tail("/no/such/log/file.log", 10), None);
    }

    #[test]
    fn test_tail_short_file_returns_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        assert_eq!(tail(&path, 10).unwrap(), "one\ntwo");
    }

    #[test]
    fn test_tail_returns_last_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log");
        let content: String = (1..=50).map(|i| format!("line {i}\n")).collect();
        std::fs::write(&path, content).unwrap();

        let tailed = tail(&path, 3).unwrap();
        assert_eq!(tailed, "line 48\nline 49\nline 50");
    }

    #[test]
    fn test_tail_file_spanning_many_chunks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log");

        // Each line ~70 bytes, 2000 lines: several CHUNK_SIZE reads.
        let padding = "x".repeat(60);
        let content: String = (1..=2000).map(|i| format!("entry {i} {padding}\n")).collect();
        std::fs::write(&path, content).unwrap();

        let tailed = tail(&path, 5).unwrap();
        let got: Vec<&str> = tailed.lines().collect();
        assert_eq!(got.len(), 5);
        assert!(got[0].starts_with("entry 1996 "));
        assert!(got[4].starts_with("entry 2000 "));

        // A request wider than one chunk accumulates multiple reads.
        let tailed = tail(&path, 200).unwrap();
        let got: Vec<&str> = tailed.lines().collect();
        assert_eq!(got.len(), 200);
        assert!(got[0].starts_with("entry 1801 "));
        assert!(got[199].starts_with("entry 2000 "));
    }

    #[test]
    fn test_tail_no_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "alpha\nbeta").unwrap();

        assert_eq!(tail(&path, 1).unwrap(), "beta");
    }

    #[test]
    fn test_tail_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "").unwrap();

        assert_eq!(tail(&path, 5).unwrap(), "");
    }
}
