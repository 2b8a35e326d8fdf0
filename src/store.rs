//! Position persistence port.
//!
//! Reading positions are keyed by book identity (a path, URI or any stable
//! string the host picks). Stores also remember which book was opened last so
//! a host can reopen it on startup.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReaderError;
use crate::position::PositionRecord;

/// Key-value storage for reading positions.
pub trait PositionStore {
    /// Saved position for `book_id`, if any.
    fn load(&self, book_id: &str) -> Result<Option<PositionRecord>, ReaderError>;

    /// Save the position for `book_id` and mark it as the last opened book.
    fn save(&mut self, book_id: &str, record: PositionRecord) -> Result<(), ReaderError>;

    /// Identity of the most recently opened book.
    fn last_opened(&self) -> Result<Option<String>, ReaderError>;

    /// Mark `book_id` as the most recently opened book.
    fn set_last_opened(&mut self, book_id: &str) -> Result<(), ReaderError>;
}

impl<S: PositionStore + ?Sized> PositionStore for &mut S {
    fn load(&self, book_id: &str) -> Result<Option<PositionRecord>, ReaderError> {
        (**self).load(book_id)
    }

    fn save(&mut self, book_id: &str, record: PositionRecord) -> Result<(), ReaderError> {
        (**self).save(book_id, record)
    }

    fn last_opened(&self) -> Result<Option<String>, ReaderError> {
        (**self).last_opened()
    }

    fn set_last_opened(&mut self, book_id: &str) -> Result<(), ReaderError> {
        (**self).set_last_opened(book_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    last_opened: Option<String>,
    #[serde(default)]
    books: BTreeMap<String, PositionRecord>,
}

impl StoreData {
    fn save(&mut self, book_id: &str, record: PositionRecord) {
        self.books.insert(book_id.to_string(), record);
        self.last_opened = Some(book_id.to_string());
    }
}

/// In-memory store. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: StoreData,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PositionStore for MemoryStore {
    fn load(&self, book_id: &str) -> Result<Option<PositionRecord>, ReaderError> {
        Ok(self.data.books.get(book_id).copied())
    }

    fn save(&mut self, book_id: &str, record: PositionRecord) -> Result<(), ReaderError> {
        self.data.save(book_id, record);
        self.writes += 1;
        Ok(())
    }

    fn last_opened(&self) -> Result<Option<String>, ReaderError> {
        Ok(self.data.last_opened.clone())
    }

    fn set_last_opened(&mut self, book_id: &str) -> Result<(), ReaderError> {
        self.data.last_opened = Some(book_id.to_string());
        Ok(())
    }
}

/// JSON file store. Every write rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts an empty store. A file that does not parse is
    /// logged and replaced on the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable position store '{}': {}",
                    path.display(),
                    err
                );
                StoreData::default()
            })
        } else {
            StoreData::default()
        };
        Ok(Self { path, data })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), ReaderError> {
        let serialized = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, serialized).map_err(|e| {
            ReaderError::Store(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self, book_id: &str) -> Result<Option<PositionRecord>, ReaderError> {
        Ok(self.data.books.get(book_id).copied())
    }

    fn save(&mut self, book_id: &str, record: PositionRecord) -> Result<(), ReaderError> {
        self.data.save(book_id, record);
        self.persist()
    }

    fn last_opened(&self) -> Result<Option<String>, ReaderError> {
        Ok(self.data.last_opened.clone())
    }

    fn set_last_opened(&mut self, book_id: &str) -> Result<(), ReaderError> {
        self.data.last_opened = Some(book_id.to_string());
        self.persist()
    }
}
