//! Optional async helper for opening a book.
//!
//! This module is available with the `async` feature.

use core::result::Result;
use std::path::Path;

use crate::book::Book;
use crate::container::ContainerParser;
use crate::error::ReaderError;

/// Read a container file asynchronously and load it as a [`Book`].
///
/// Only the file read is async; parsing runs on the calling task.
pub async fn open_book_async<P, C>(path: P, parser: &C) -> Result<Book, ReaderError>
where
    P: AsRef<Path>,
    C: ContainerParser + ?Sized,
{
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ReaderError::Io(e.to_string()))?;
    Book::load(&bytes, parser)
}
