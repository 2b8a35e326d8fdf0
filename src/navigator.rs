//! Tap-driven pagination over a book's chapters.
//!
//! The [`Navigator`] owns the book and the reading cursor and talks to the
//! host through two ports: a [`RenderSurface`] that displays chapter content
//! and a [`PositionStore`] that persists `(chapter_index, viewport_offset)`.
//!
//! Crossing a chapter boundary is two-phase. The navigator hands the new
//! chapter to the surface and records a pending restore offset; once the host
//! sees the surface finish layout it calls
//! [`Navigator::restore_pending_offset`] with the real content height.
//!
//! ```rust
//! use epub_pager::{Book, MemoryStore, Navigator, SpineResource, TapEvent, TextSurface};
//!
//! let book = Book::from_resources(vec![
//!     SpineResource::new("c1", "<p>one</p>"),
//!     SpineResource::new("c2", "<p>two</p>"),
//! ]);
//! let mut nav = Navigator::open(book, "demo", MemoryStore::new(), TextSurface::new(40));
//! let height = nav.surface().content_height();
//! nav.restore_pending_offset(height);
//!
//! // tap the right edge with the whole chapter already visible
//! nav.on_tap(TapEvent::new(390.0, 400.0, 20, height));
//! assert_eq!(nav.position().chapter_index, 1);
//! ```

extern crate alloc;

use alloc::string::String;

use chrono::NaiveTime;

use crate::book::Book;
use crate::error::ReaderError;
use crate::position::ReadingPosition;
use crate::progress::compute_progress;
use crate::status::StatusLine;
use crate::store::PositionStore;
use crate::surface::{wrap_chapter_html, RenderSurface, StyleOptions};

/// Overlap kept between consecutive pages, in surface units.
pub const PAGE_OVERLAP: u32 = 40;

/// Taps left of this percentage of the viewport width page back.
pub const BACK_ZONE_END_PERCENT: u32 = 33;

/// Taps right of this percentage of the viewport width page forward.
pub const FORWARD_ZONE_START_PERCENT: u32 = 66;

/// Horizontal tap zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapZone {
    /// Left third: previous page.
    Back,
    /// Middle third: show or hide host chrome.
    ToggleChrome,
    /// Right third: next page.
    Forward,
}

impl TapZone {
    /// Classify a tap at `x` within a viewport `viewport_width` wide.
    ///
    /// Both zone boundaries belong to the middle zone.
    pub fn classify(x: f32, viewport_width: f32) -> Self {
        if viewport_width <= 0.0 || !viewport_width.is_finite() || !x.is_finite() {
            return TapZone::ToggleChrome;
        }
        // both products are exact in f64, so an edge tap stays in the middle
        let scaled_x = f64::from(x) * 100.0;
        let width = f64::from(viewport_width);
        if scaled_x < width * f64::from(BACK_ZONE_END_PERCENT) {
            TapZone::Back
        } else if scaled_x > width * f64::from(FORWARD_ZONE_START_PERCENT) {
            TapZone::Forward
        } else {
            TapZone::ToggleChrome
        }
    }
}

/// Tap location plus the surface metrics at the time of the tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapEvent {
    /// Horizontal tap position.
    pub x: f32,
    /// Viewport width, same units as `x`.
    pub viewport_width: f32,
    /// Viewport height in surface units.
    pub viewport_height: u32,
    /// Rendered height of the current chapter in surface units.
    pub content_height: u32,
    /// Host reports the viewport at the very top of the content.
    pub at_top: bool,
    /// Host reports the viewport at the very bottom of the content.
    pub at_bottom: bool,
}

impl TapEvent {
    /// Tap with no edge hints from the host.
    pub fn new(x: f32, viewport_width: f32, viewport_height: u32, content_height: u32) -> Self {
        Self {
            x,
            viewport_width,
            viewport_height,
            content_height,
            at_top: false,
            at_bottom: false,
        }
    }

    /// Attach the host's edge hints.
    pub fn with_edges(mut self, at_top: bool, at_bottom: bool) -> Self {
        self.at_top = at_top;
        self.at_bottom = at_bottom;
        self
    }

    /// Zone this tap falls in.
    pub fn zone(&self) -> TapZone {
        TapZone::classify(self.x, self.viewport_width)
    }
}

/// What a tap did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Scrolled within the current chapter.
    Scrolled {
        /// New viewport offset.
        offset: u32,
    },
    /// Moved to another chapter; a pending restore is scheduled.
    ChapterChanged {
        /// New chapter index.
        chapter_index: usize,
    },
    /// Middle-zone tap. Position untouched.
    ToggleChrome {
        /// Chrome visibility after the toggle.
        visible: bool,
    },
    /// Nothing to do (start or end of book, or no chapters).
    NoOp,
}

impl TapOutcome {
    /// Whether the reading position changed.
    pub fn moved(&self) -> bool {
        matches!(
            self,
            TapOutcome::Scrolled { .. } | TapOutcome::ChapterChanged { .. }
        )
    }
}

/// Navigator configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorOptions {
    /// Overlap between consecutive pages.
    pub page_overlap: u32,
    /// Whether host chrome starts visible after a book opens.
    pub chrome_visible_on_open: bool,
    /// Wrap chapter markup before handing it to the surface.
    ///
    /// `None` passes the chapter's own markup through untouched.
    pub style: Option<StyleOptions>,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            page_overlap: PAGE_OVERLAP,
            chrome_visible_on_open: false,
            style: Some(StyleOptions::default()),
        }
    }
}

/// Builder for [`Navigator`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigatorBuilder {
    options: NavigatorOptions,
}

impl NavigatorBuilder {
    /// Builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page overlap.
    pub fn page_overlap(mut self, overlap: u32) -> Self {
        self.options.page_overlap = overlap;
        self
    }

    /// Keep host chrome visible after opening.
    pub fn chrome_visible_on_open(mut self, visible: bool) -> Self {
        self.options.chrome_visible_on_open = visible;
        self
    }

    /// Wrap chapter markup with `style`.
    pub fn style(mut self, style: StyleOptions) -> Self {
        self.options.style = Some(style);
        self
    }

    /// Hand chapter markup to the surface unmodified.
    pub fn plain_content(mut self) -> Self {
        self.options.style = None;
        self
    }

    /// Open `book` with the configured options.
    pub fn open<S: PositionStore, R: RenderSurface>(
        self,
        book: Book,
        book_id: impl Into<String>,
        store: S,
        surface: R,
    ) -> Navigator<S, R> {
        Navigator::open_with_options(book, book_id, store, surface, self.options)
    }
}

/// Reading cursor over one book, wired to a store and a surface.
pub struct Navigator<S: PositionStore, R: RenderSurface> {
    book: Book,
    book_id: String,
    position: ReadingPosition,
    content_height: u32,
    progress: u8,
    chrome_visible: bool,
    render_deferred: bool,
    options: NavigatorOptions,
    store: S,
    surface: R,
}

impl<S: PositionStore, R: RenderSurface> Navigator<S, R> {
    /// Open `book` with default options.
    pub fn open(book: Book, book_id: impl Into<String>, store: S, surface: R) -> Self {
        Self::open_with_options(book, book_id, store, surface, NavigatorOptions::default())
    }

    /// Open `book`, seeding the cursor from `store`.
    ///
    /// A saved chapter index past the end of the book falls back to the first
    /// chapter. The saved offset is applied by the first
    /// [`restore_pending_offset`](Self::restore_pending_offset) call.
    pub fn open_with_options(
        book: Book,
        book_id: impl Into<String>,
        mut store: S,
        surface: R,
        options: NavigatorOptions,
    ) -> Self {
        let book_id = book_id.into();
        let saved = store.load(&book_id).unwrap_or_else(|err| {
            log::warn!("Could not load saved position for '{}': {}", book_id, err);
            None
        });

        let mut position = ReadingPosition::default();
        if !book.is_empty() {
            position.pending_restore_offset = Some(0);
            match saved {
                Some(record) if record.chapter_index < book.len() => {
                    position.chapter_index = record.chapter_index;
                    position.pending_restore_offset = Some(record.viewport_offset);
                }
                Some(record) => log::warn!(
                    "Saved chapter {} out of range for '{}' ({} chapters), starting over",
                    record.chapter_index,
                    book_id,
                    book.len()
                ),
                None => {}
            }
        }

        if let Err(err) = store.set_last_opened(&book_id) {
            log::warn!("Could not record '{}' as last opened: {}", book_id, err);
        }

        let mut nav = Self {
            book,
            book_id,
            position,
            content_height: 0,
            progress: 0,
            chrome_visible: options.chrome_visible_on_open,
            render_deferred: false,
            options,
            store,
            surface,
        };
        log::info!(
            "Opened '{}' at chapter {} ({} chapters)",
            nav.book_id,
            nav.position.chapter_index,
            nav.book.len()
        );
        nav.render_current();
        nav.progress = nav.compute_progress();
        nav
    }

    /// Loaded book.
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Identity key used with the position store.
    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Current reading cursor.
    pub fn position(&self) -> &ReadingPosition {
        &self.position
    }

    /// Last known rendered height of the current chapter (0 when unknown).
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Progress computed after the last state change.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether host chrome should be shown.
    pub fn chrome_visible(&self) -> bool {
        self.chrome_visible
    }

    /// Whether a chapter hand-off is waiting for the surface to become ready.
    pub fn is_render_deferred(&self) -> bool {
        self.render_deferred
    }

    /// Active options.
    pub fn options(&self) -> &NavigatorOptions {
        &self.options
    }

    /// Position store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rendering surface.
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Mutable rendering surface, for host-side state such as attaching.
    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    /// Tear down into the book, store and surface.
    pub fn into_parts(self) -> (Book, S, R) {
        (self.book, self.store, self.surface)
    }

    /// Handle a tap.
    pub fn on_tap(&mut self, event: TapEvent) -> TapOutcome {
        let zone = event.zone();
        log::debug!(
            "tap x={} width={} zone={:?} chapter={} offset={}",
            event.x,
            event.viewport_width,
            zone,
            self.position.chapter_index,
            self.position.viewport_offset
        );

        if zone == TapZone::ToggleChrome {
            self.chrome_visible = !self.chrome_visible;
            return TapOutcome::ToggleChrome {
                visible: self.chrome_visible,
            };
        }
        if self.book.is_empty() {
            return TapOutcome::NoOp;
        }

        let outcome = match zone {
            TapZone::Forward => self.page_forward(&event),
            TapZone::Back => self.page_back(&event),
            TapZone::ToggleChrome => TapOutcome::NoOp,
        };
        if outcome.moved() {
            self.commit();
        }
        outcome
    }

    /// Whole-book progress for the current state, in `[0, 100]`.
    pub fn compute_progress(&self) -> u8 {
        compute_progress(&self.book, &self.position, self.content_height)
    }

    /// Apply the pending restore offset after the surface finished layout.
    ///
    /// Returns `false` without touching anything when no restore is pending,
    /// or when the chapter never reached the surface.
    pub fn restore_pending_offset(&mut self, new_content_height: u32) -> bool {
        if self.render_deferred {
            log::debug!("restore ignored, chapter not rendered yet");
            return false;
        }
        let Some(target) = self.position.pending_restore_offset.take() else {
            return false;
        };

        self.content_height = new_content_height;
        let offset = target.min(new_content_height);
        let changed = offset != self.position.viewport_offset;
        self.position.viewport_offset = offset;
        self.surface.scroll_to(offset);
        log::debug!(
            "restored offset {} (requested {}) in chapter {}",
            offset,
            target,
            self.position.chapter_index
        );

        if changed {
            self.commit();
        } else {
            self.progress = self.compute_progress();
        }
        true
    }

    /// Record a scroll the host performed itself (drag, fling, keyboard).
    ///
    /// Supersedes any pending restore. Returns whether the offset changed.
    pub fn on_scroll(&mut self, offset: u32, content_height: u32) -> bool {
        if self.book.is_empty() {
            return false;
        }
        self.position.pending_restore_offset = None;
        self.content_height = content_height;
        let offset = if content_height > 0 {
            offset.min(content_height)
        } else {
            offset
        };
        if offset == self.position.viewport_offset {
            self.progress = self.compute_progress();
            return false;
        }
        self.position.viewport_offset = offset;
        self.commit();
        true
    }

    /// Jump to the top of chapter `index`.
    pub fn jump_to_chapter(&mut self, index: usize) -> Result<(), ReaderError> {
        self.book.chapter(index)?;
        self.enter_chapter(index);
        self.commit();
        Ok(())
    }

    /// Retry a chapter hand-off the surface refused earlier.
    ///
    /// Returns `true` once the surface has accepted the content. The fresh
    /// layout starts at the top, so the current offset is queued for
    /// [`restore_pending_offset`](Self::restore_pending_offset) unless a
    /// restore is already waiting.
    pub fn resume_rendering(&mut self) -> bool {
        if !self.render_deferred {
            return false;
        }
        self.render_current();
        if self.render_deferred {
            return false;
        }
        if self.position.pending_restore_offset.is_none() {
            self.position.pending_restore_offset = Some(self.position.viewport_offset);
        }
        true
    }

    /// Status line for the current progress at wall-clock time `clock`.
    pub fn status_line(&self, clock: NaiveTime, battery_percent: Option<u8>) -> StatusLine {
        StatusLine {
            clock,
            battery_percent,
            percent: self.progress,
        }
    }

    fn page_step(&self, viewport_height: u32) -> u32 {
        viewport_height
            .saturating_sub(self.options.page_overlap)
            .max(1)
    }

    fn page_forward(&mut self, event: &TapEvent) -> TapOutcome {
        let offset = self.position.viewport_offset;
        let more_below = !event.at_bottom
            && event.content_height.saturating_sub(offset) > event.viewport_height;

        if more_below {
            let next = offset.saturating_add(self.page_step(event.viewport_height));
            self.scroll_within(next, event.content_height)
        } else if self.position.chapter_index + 1 < self.book.len() {
            self.enter_chapter(self.position.chapter_index + 1)
        } else {
            log::debug!("end of book");
            TapOutcome::NoOp
        }
    }

    fn page_back(&mut self, event: &TapEvent) -> TapOutcome {
        let offset = self.position.viewport_offset;

        if offset > 0 && !event.at_top {
            let prev = offset.saturating_sub(self.page_step(event.viewport_height));
            self.scroll_within(prev, event.content_height)
        } else if self.position.chapter_index > 0 {
            // lands at the top of the previous chapter, not its end
            self.enter_chapter(self.position.chapter_index - 1)
        } else if offset > 0 {
            // host is already showing the top; drop the stale offset
            self.scroll_within(0, event.content_height)
        } else {
            log::debug!("start of book");
            TapOutcome::NoOp
        }
    }

    fn scroll_within(&mut self, offset: u32, content_height: u32) -> TapOutcome {
        self.position.viewport_offset = offset;
        self.position.pending_restore_offset = None;
        self.content_height = content_height;
        self.surface.scroll_to(offset);
        TapOutcome::Scrolled { offset }
    }

    fn enter_chapter(&mut self, index: usize) -> TapOutcome {
        self.position.chapter_index = index;
        self.position.viewport_offset = 0;
        self.position.pending_restore_offset = Some(0);
        self.content_height = 0;
        self.render_current();
        TapOutcome::ChapterChanged {
            chapter_index: index,
        }
    }

    fn render_current(&mut self) {
        let html = match self.book.chapter_html(self.position.chapter_index) {
            Ok(html) => html,
            Err(_) => return,
        };
        let html = match &self.options.style {
            Some(style) => wrap_chapter_html(&html, style),
            None => html,
        };
        match self.surface.load_content(&html) {
            Ok(()) => self.render_deferred = false,
            Err(ReaderError::RenderTargetUnavailable) => {
                log::debug!(
                    "surface not ready, deferring chapter {}",
                    self.position.chapter_index
                );
                self.render_deferred = true;
            }
            Err(err) => {
                log::warn!(
                    "Surface rejected chapter {}: {}",
                    self.position.chapter_index,
                    err
                );
                self.render_deferred = true;
            }
        }
    }

    fn commit(&mut self) {
        let record = self.position.record();
        if let Err(err) = self.store.save(&self.book_id, record) {
            log::warn!("Could not save position for '{}': {}", self.book_id, err);
        }
        self.progress = self.compute_progress();
    }
}
