//! Container parser port.
//!
//! Unzipping the archive and walking the OPF spine is the `epub` crate's job.
//! This module only defines the narrow shape the book model consumes: an
//! ordered list of spine resources with their raw bytes.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use std::io::Cursor;

use epub::doc::EpubDoc;

use crate::error::ReaderError;

/// One spine entry as delivered by a container parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpineResource {
    /// Manifest id referenced by the spine `itemref`.
    pub idref: String,
    /// Raw chapter bytes (usually XHTML).
    pub data: Vec<u8>,
}

impl SpineResource {
    /// Create a spine resource from an id and its content.
    pub fn new(idref: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            idref: idref.into(),
            data: data.into(),
        }
    }

    /// Length of the resource content in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Turns raw container bytes into spine-ordered resources.
pub trait ContainerParser {
    /// Parse `bytes` and return spine resources in reading order.
    ///
    /// Fails with [`ReaderError::Parse`] on malformed input.
    fn parse(&self, bytes: &[u8]) -> Result<Vec<SpineResource>, ReaderError>;
}

/// [`ContainerParser`] backed by the `epub` crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpubContainer {
    strict: bool,
}

impl EpubContainer {
    /// Lenient parser: spine entries whose resource is missing are skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict parser: a spine entry without a readable resource is an error.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl ContainerParser for EpubContainer {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<SpineResource>, ReaderError> {
        let mut doc = EpubDoc::from_reader(Cursor::new(bytes.to_vec()))
            .map_err(|e| ReaderError::Parse(e.to_string()))?;

        let idrefs: Vec<String> = doc.spine.iter().map(|item| item.idref.clone()).collect();
        let mut out = Vec::with_capacity(idrefs.len());
        for idref in idrefs {
            match doc.get_resource(&idref) {
                Some((data, _mime)) => out.push(SpineResource { idref, data }),
                None if self.strict => {
                    return Err(ReaderError::Parse(format!(
                        "spine item '{}' has no readable resource",
                        idref
                    )));
                }
                None => log::warn!("Skipping unreadable spine item '{}'", idref),
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epub_container_rejects_garbage() {
        let err = EpubContainer::new()
            .parse(b"definitely not a zip archive")
            .expect_err("garbage should not parse");
        assert!(matches!(err, ReaderError::Parse(_)));
    }

    #[test]
    fn test_epub_container_rejects_empty_input() {
        let err = EpubContainer::strict()
            .parse(&[])
            .expect_err("empty input should not parse");
        assert!(matches!(err, ReaderError::Parse(_)));
    }

    #[test]
    fn test_spine_resource_byte_len() {
        let res = SpineResource::new("ch1", "<p>hello</p>");
        assert_eq!(res.byte_len(), 12);
        assert_eq!(res.idref, "ch1");
    }
}
