//! Document rows loaded from a file.
//!
//! The document is populated once at startup and never mutated afterwards;
//! this core renders and navigates it but does not edit it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{EditorError, Result};

/// One line of text, immutable once loaded.
#[derive(Debug)]
pub struct Row {
    text: String,
}

impl Row {
    fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered sequence of rows.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
}

impl Document {
    /// The document used when no path argument was given.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read at most the first line of `path`, with trailing line-ending
    /// bytes stripped. An unreadable path is fatal; there is no silent
    /// empty-document fallback.
    pub fn load(path: &Path) -> Result<Self> {
        let open_err = |source| EditorError::FileOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let read = reader.read_line(&mut line).map_err(open_err)?;

        let mut rows = Vec::new();
        if read > 0 {
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            rows.push(Row::new(line));
        }
        Ok(Self { rows })
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "femto-doc-test-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_keeps_first_line_only() {
        let path = temp_file("first-line", b"hello editor\nsecond line\n");
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.row(0).unwrap().text(), "hello editor");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_strips_crlf() {
        let path = temp_file("crlf", b"windows line\r\n");
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.row(0).unwrap().text(), "windows line");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_line_without_terminator() {
        let path = temp_file("no-newline", b"bare line");
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.row(0).unwrap().text(), "bare line");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_empty_file_yields_empty_document() {
        let path = temp_file("empty", b"");
        let doc = Document::load(&path).unwrap();
        assert!(doc.is_empty());
        assert!(doc.row(0).is_none());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_a_file_open_error() {
        let path = std::env::temp_dir().join("femto-doc-test-definitely-missing");
        match Document::load(&path) {
            Err(EditorError::FileOpen { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileOpen error, got {other:?}"),
        }
    }
}
