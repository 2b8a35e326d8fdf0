//! Reading cursor and its persisted form.

use serde::{Deserialize, Serialize};

/// Mutable cursor over a [`Book`](crate::book::Book).
///
/// `viewport_offset` is measured in rendering-surface units and only means
/// something relative to the current chapter's rendered height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadingPosition {
    /// 0-based chapter index in spine order.
    pub chapter_index: usize,
    /// Vertical offset into the current chapter's rendered content.
    pub viewport_offset: u32,
    /// Offset to apply once the freshly rendered chapter has laid out.
    pub pending_restore_offset: Option<u32>,
}

impl ReadingPosition {
    /// Cursor at the top of `chapter_index` with nothing pending.
    pub fn at_chapter(chapter_index: usize) -> Self {
        Self {
            chapter_index,
            viewport_offset: 0,
            pending_restore_offset: None,
        }
    }

    /// Check whether a restore is waiting for a layout pass.
    pub fn has_pending_restore(&self) -> bool {
        self.pending_restore_offset.is_some()
    }

    /// The `(chapter_index, viewport_offset)` pair to persist.
    pub fn record(&self) -> PositionRecord {
        PositionRecord {
            chapter_index: self.chapter_index,
            viewport_offset: self.viewport_offset,
        }
    }
}

/// Persisted reading position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// 0-based chapter index in spine order.
    pub chapter_index: usize,
    /// Vertical offset into that chapter.
    pub viewport_offset: u32,
}

impl PositionRecord {
    /// Create a record.
    pub fn new(chapter_index: usize, viewport_offset: u32) -> Self {
        Self {
            chapter_index,
            viewport_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_drops_pending_restore() {
        let pos = ReadingPosition {
            chapter_index: 3,
            viewport_offset: 120,
            pending_restore_offset: Some(900),
        };
        assert_eq!(pos.record(), PositionRecord::new(3, 120));
        assert!(pos.has_pending_restore());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_string(&PositionRecord::new(2, 760)).unwrap();
        assert_eq!(json, r#"{"chapter_index":2,"viewport_offset":760}"#);
    }
}
