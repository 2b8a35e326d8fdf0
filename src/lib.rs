//! epub_pager -- chapter-relative pagination for EPUB readers
//!
//! Tracks a reading position over a book's spine and turns edge taps into
//! page turns. Progress is weighted by chapter byte size, so it is stable
//! across font and viewport changes.
//!
//! The crate does no EPUB parsing and no HTML rendering of its own. Both sit
//! behind ports:
//!
//! - [`ContainerParser`] -- container bytes to spine resources
//!   ([`EpubContainer`] uses the `epub` crate)
//! - [`RenderSurface`] -- displays chapter content ([`TextSurface`] renders
//!   to wrapped terminal lines)
//! - [`PositionStore`] -- persists reading positions ([`MemoryStore`],
//!   [`JsonFileStore`])
//!
//! # Features
//!
//! - `async` -- `open_book_async` through `tokio::fs`
//! - `cli` -- the `epub-pager` terminal binary

#![warn(missing_docs)]
#![deny(clippy::large_enum_variant, clippy::large_stack_arrays, clippy::redundant_clone)]
#![warn(
    clippy::box_collection,
    clippy::needless_collect,
    clippy::map_clone,
    clippy::implicit_clone,
    clippy::inefficient_to_string
)]

extern crate alloc;

pub mod book;
pub mod container;
pub mod error;
pub mod navigator;
pub mod position;
pub mod progress;
pub mod status;
pub mod store;
pub mod surface;
pub mod text_surface;

#[cfg(feature = "async")]
pub mod async_api;

// Re-export key types for convenience
#[cfg(feature = "async")]
pub use async_api::open_book_async;
pub use book::{Book, Chapter};
pub use container::{ContainerParser, EpubContainer, SpineResource};
pub use error::ReaderError;
pub use navigator::{
    Navigator, NavigatorBuilder, NavigatorOptions, TapEvent, TapOutcome, TapZone, PAGE_OVERLAP,
};
pub use position::{PositionRecord, ReadingPosition};
pub use progress::{compute_progress, progress_ratio};
pub use status::StatusLine;
pub use store::{JsonFileStore, MemoryStore, PositionStore};
pub use surface::{wrap_chapter_html, RenderSurface, StyleOptions};
pub use text_surface::TextSurface;
