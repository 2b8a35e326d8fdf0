//! Byte-weighted reading progress.
//!
//! Progress is an estimate of how much of the book's source bytes lie before
//! the viewport: every chapter before the current one counts in full, and the
//! current chapter counts by the fraction `viewport_offset / content_height`.

use crate::book::Book;
use crate::position::ReadingPosition;

/// Whole-book completion percentage in `[0, 100]`.
///
/// Returns 0 for an empty book or when every chapter is zero-length. The
/// intra-chapter term is skipped when `content_height` is 0 (layout unknown).
pub fn compute_progress(book: &Book, position: &ReadingPosition, content_height: u32) -> u8 {
    let total = book.total_bytes();
    if book.is_empty() || total == 0 {
        return 0;
    }

    let index = position.chapter_index.min(book.len() - 1);
    let mut bytes_read = u128::from(book.bytes_before(index)) * u128::from(content_height.max(1));
    let scale = if content_height > 0 {
        let offset = position.viewport_offset.min(content_height);
        bytes_read += u128::from(book.chapter_bytes(index)) * u128::from(offset);
        u128::from(content_height)
    } else {
        1
    };

    // floor(100 * bytes_read / (total * scale)) without leaving integer math
    let percent = (bytes_read * 100) / (u128::from(total) * scale);
    percent.min(100) as u8
}

/// Same as [`compute_progress`] but as a ratio in `[0.0, 1.0]`.
pub fn progress_ratio(book: &Book, position: &ReadingPosition, content_height: u32) -> f32 {
    let total = book.total_bytes();
    if book.is_empty() || total == 0 {
        return 0.0;
    }
    let index = position.chapter_index.min(book.len() - 1);
    let mut read = book.bytes_before(index) as f64;
    if content_height > 0 {
        let fraction = f64::from(position.viewport_offset.min(content_height))
            / f64::from(content_height);
        read += book.chapter_bytes(index) as f64 * fraction;
    }
    (read / total as f64).clamp(0.0, 1.0) as f32
}
