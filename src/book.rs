//! Book model: an ordered, immutable sequence of chapters.
//!
//! A [`Book`] is built once per opened file and never mutated. Each chapter
//! carries its raw bytes, and the byte length doubles as the weight used for
//! whole-book progress. The total is cached at load time.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use std::fs;
use std::path::Path;

use crate::container::{ContainerParser, SpineResource};
use crate::error::ReaderError;

/// One spine entry of a loaded book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chapter {
    index: usize,
    idref: String,
    content: Vec<u8>,
}

impl Chapter {
    /// 0-based position in reading order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Spine id reported by the container parser.
    pub fn idref(&self) -> &str {
        &self.idref
    }

    /// Size of the chapter's source content in bytes.
    pub fn byte_size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Raw renderable payload.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn html(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Ordered chapters plus the cached byte total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Book {
    chapters: Vec<Chapter>,
    total_bytes: u64,
}

impl Book {
    /// A book with no chapters. Valid, but nothing can be navigated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `raw` with `parser` and normalize the spine into chapters.
    ///
    /// Fails with [`ReaderError::Parse`] on a malformed container and with
    /// [`ReaderError::EmptyBook`] when the spine yields no chapters.
    pub fn load<P: ContainerParser + ?Sized>(raw: &[u8], parser: &P) -> Result<Self, ReaderError> {
        let resources = parser.parse(raw)?;
        if resources.is_empty() {
            return Err(ReaderError::EmptyBook);
        }
        let book = Self::from_resources(resources);
        log::info!(
            "Loaded book: {} chapters, {} bytes",
            book.len(),
            book.total_bytes()
        );
        Ok(book)
    }

    /// Read a container from disk and load it.
    pub fn open<P: ContainerParser + ?Sized, Q: AsRef<Path>>(
        path: Q,
        parser: &P,
    ) -> Result<Self, ReaderError> {
        let raw = fs::read(path)?;
        Self::load(&raw, parser)
    }

    /// Build a book from already-parsed spine resources.
    pub fn from_resources(resources: Vec<SpineResource>) -> Self {
        let chapters: Vec<Chapter> = resources
            .into_iter()
            .enumerate()
            .map(|(index, res)| Chapter {
                index,
                idref: res.idref,
                content: res.data,
            })
            .collect();
        let total_bytes = chapters.iter().map(Chapter::byte_size).sum();
        Self {
            chapters,
            total_bytes,
        }
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Check if the book has no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Sum of all chapter byte sizes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Iterate chapters in reading order.
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> + '_ {
        self.chapters.iter()
    }

    /// Get a chapter by index.
    pub fn chapter(&self, index: usize) -> Result<&Chapter, ReaderError> {
        self.chapters
            .get(index)
            .ok_or(ReaderError::ChapterOutOfBounds {
                index,
                chapter_count: self.chapters.len(),
            })
    }

    /// Chapter content as HTML text.
    pub fn chapter_html(&self, index: usize) -> Result<String, ReaderError> {
        self.chapter(index).map(Chapter::html)
    }

    /// Byte size of the chapter at `index`, or 0 when out of range.
    pub fn chapter_bytes(&self, index: usize) -> u64 {
        self.chapters.get(index).map_or(0, Chapter::byte_size)
    }

    /// Sum of byte sizes of every chapter strictly before `index`.
    pub fn bytes_before(&self, index: usize) -> u64 {
        self.chapters
            .iter()
            .take(index)
            .map(Chapter::byte_size)
            .sum()
    }

    /// Index of the last chapter, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.chapters.len().checked_sub(1)
    }
}
