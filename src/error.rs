//! Unified error type for epub_pager
//!
//! Every failure here is local-recover: callers log it and fall back to an
//! empty or unchanged reading state. Nothing in this crate aborts the host.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

/// Top-level error type for epub_pager operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReaderError {
    /// Container could not be parsed (malformed or unreadable EPUB)
    Parse(String),
    /// Container parsed but holds no spine entries
    EmptyBook,
    /// Host rendering surface cannot accept content yet
    RenderTargetUnavailable,
    /// I/O error (description only, since `std::io::Error` is not `Clone`)
    Io(String),
    /// Position store failed to read or write
    Store(String),
    /// Chapter index requested is out of bounds
    ChapterOutOfBounds {
        /// Requested chapter index.
        index: usize,
        /// Total number of chapters available.
        chapter_count: usize,
    },
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ReaderError::EmptyBook => write!(f, "Book has no chapters"),
            ReaderError::RenderTargetUnavailable => {
                write!(f, "Rendering surface is not ready")
            }
            ReaderError::Io(msg) => write!(f, "I/O error: {}", msg),
            ReaderError::Store(msg) => write!(f, "Position store error: {}", msg),
            ReaderError::ChapterOutOfBounds {
                index,
                chapter_count,
            } => write!(
                f,
                "Chapter index {} out of bounds (chapter count: {})",
                index, chapter_count
            ),
        }
    }
}

impl std::error::Error for ReaderError {}

impl From<std::io::Error> for ReaderError {
    fn from(err: std::io::Error) -> Self {
        ReaderError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        ReaderError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_error_display() {
        let err = ReaderError::Parse("bad zip".into());
        assert_eq!(format!("{}", err), "Parse error: bad zip");
    }

    #[test]
    fn test_chapter_out_of_bounds_display() {
        let err = ReaderError::ChapterOutOfBounds {
            index: 7,
            chapter_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Chapter index 7 out of bounds (chapter count: 3)"
        );
    }

    #[test]
    fn test_io_error_converts_to_description() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.epub");
        let err = ReaderError::from(io);
        assert!(matches!(err, ReaderError::Io(ref msg) if msg.contains("missing.epub")));
    }

    #[test]
    fn test_empty_book_debug() {
        assert_eq!(format!("{:?}", ReaderError::EmptyBook), "EmptyBook");
    }
}
