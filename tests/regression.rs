//! Regression tests for pagination behaviour
//!
//! Each test pins down a concrete paging or progress case that broke, or was
//! easy to break, while the navigator was being tuned. They go through the
//! public API only.

use epub_pager::{
    compute_progress, Book, MemoryStore, Navigator, PositionRecord, PositionStore, ReaderError,
    ReadingPosition, RenderSurface, SpineResource, TapEvent, TapOutcome, TextSurface,
};

/// Surface that accepts everything and remembers the last scroll.
#[derive(Default)]
struct NullSurface {
    loads: usize,
    scrolled_to: Option<u32>,
}

impl RenderSurface for NullSurface {
    fn load_content(&mut self, _html: &str) -> Result<(), ReaderError> {
        self.loads += 1;
        Ok(())
    }

    fn scroll_to(&mut self, offset: u32) {
        self.scrolled_to = Some(offset);
    }
}

fn book_of(sizes: &[usize]) -> Book {
    Book::from_resources(
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| SpineResource::new(format!("c{}", i), vec![b'x'; size]))
            .collect(),
    )
}

fn open(sizes: &[usize]) -> Navigator<MemoryStore, NullSurface> {
    Navigator::open(book_of(sizes), "book", MemoryStore::new(), NullSurface::default())
}

const WIDTH: f32 = 600.0;
const FORWARD_X: f32 = 590.0;
const BACK_X: f32 = 10.0;
const MIDDLE_X: f32 = 300.0;

// =============================================================================
// Progress
// =============================================================================

#[test]
fn progress_counts_whole_previous_chapters() {
    let book = book_of(&[100, 100, 100]);
    let mut pos = ReadingPosition::at_chapter(1);
    assert_eq!(compute_progress(&book, &pos, 200), 33);
    pos.viewport_offset = 100;
    assert_eq!(compute_progress(&book, &pos, 200), 50);
}

#[test]
fn progress_reaches_exact_bounds() {
    let book = book_of(&[120, 30, 250]);
    assert_eq!(compute_progress(&book, &ReadingPosition::default(), 900), 0);
    let mut end = ReadingPosition::at_chapter(2);
    end.viewport_offset = 900;
    assert_eq!(compute_progress(&book, &end, 900), 100);
}

#[test]
fn progress_never_decreases_in_reading_order() {
    let book = book_of(&[17, 400, 3, 91]);
    let height = 333;
    let mut last = 0;
    for chapter in 0..book.len() {
        for offset in (0..=height).step_by(37) {
            let mut pos = ReadingPosition::at_chapter(chapter);
            pos.viewport_offset = offset;
            let progress = compute_progress(&book, &pos, height);
            assert!(
                progress >= last,
                "progress dropped at chapter {} offset {}: {} < {}",
                chapter,
                offset,
                progress,
                last
            );
            last = progress;
        }
    }
}

#[test]
fn progress_ignores_offset_until_height_known() {
    let book = book_of(&[100, 100, 100]);
    let mut pos = ReadingPosition::at_chapter(1);
    pos.viewport_offset = 5000;
    assert_eq!(compute_progress(&book, &pos, 0), 33);
}

// =============================================================================
// Paging
// =============================================================================

#[test]
fn forward_tap_scrolls_by_viewport_minus_overlap() {
    let mut nav = open(&[100, 100]);
    nav.restore_pending_offset(1500);
    let outcome = nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));
    assert_eq!(outcome, TapOutcome::Scrolled { offset: 760 });
    assert_eq!(nav.position().chapter_index, 0);
    assert_eq!(nav.position().viewport_offset, 760);
    assert_eq!(nav.surface().scrolled_to, Some(760));
}

#[test]
fn forward_tap_past_chapter_end_enters_next_chapter() {
    let mut nav = open(&[100, 100]);
    nav.restore_pending_offset(1500);
    nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));

    let outcome = nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));
    assert_eq!(outcome, TapOutcome::ChapterChanged { chapter_index: 1 });
    assert_eq!(nav.position().viewport_offset, 0);
    assert_eq!(nav.position().pending_restore_offset, Some(0));
    assert_eq!(nav.surface().loads, 2);
}

#[test]
fn forward_tap_at_end_of_book_changes_nothing() {
    let mut nav = open(&[100, 100]);
    nav.jump_to_chapter(1).unwrap();
    nav.restore_pending_offset(1500);
    nav.on_scroll(900, 1500);
    let before = *nav.position();
    let writes = nav.store().write_count();

    let outcome = nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));
    assert_eq!(outcome, TapOutcome::NoOp);
    assert_eq!(*nav.position(), before);
    assert_eq!(nav.store().write_count(), writes);
}

#[test]
fn back_tap_at_start_of_book_changes_nothing() {
    let mut nav = open(&[100, 100]);
    nav.restore_pending_offset(1500);
    let before = *nav.position();
    let outcome = nav.on_tap(TapEvent::new(BACK_X, WIDTH, 800, 1500));
    assert_eq!(outcome, TapOutcome::NoOp);
    assert_eq!(*nav.position(), before);
}

#[test]
fn back_tap_into_previous_chapter_lands_at_top() {
    let mut nav = open(&[100, 100, 100]);
    nav.jump_to_chapter(2).unwrap();
    nav.restore_pending_offset(1500);

    let outcome = nav.on_tap(TapEvent::new(BACK_X, WIDTH, 800, 1500));
    assert_eq!(outcome, TapOutcome::ChapterChanged { chapter_index: 1 });
    assert_eq!(nav.position().viewport_offset, 0);
    assert_eq!(nav.position().pending_restore_offset, Some(0));
}

#[test]
fn middle_tap_never_moves_the_cursor() {
    let mut nav = open(&[100, 100]);
    nav.restore_pending_offset(1500);
    nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));
    let before = *nav.position();

    for (at_top, at_bottom) in [(false, false), (true, false), (false, true), (true, true)] {
        let event = TapEvent::new(MIDDLE_X, WIDTH, 800, 1500).with_edges(at_top, at_bottom);
        assert!(matches!(nav.on_tap(event), TapOutcome::ToggleChrome { .. }));
        assert_eq!(*nav.position(), before);
    }
}

#[test]
fn taps_on_exact_zone_edges_toggle_chrome() {
    for width in [300.0f32, 600.0, 1200.0] {
        let mut nav = open(&[100, 100]);
        nav.restore_pending_offset(1500);
        nav.on_tap(TapEvent::new(width * 0.9, width, 800, 1500));
        let before = *nav.position();

        for x in [width * 33.0 / 100.0, width * 66.0 / 100.0] {
            let outcome = nav.on_tap(TapEvent::new(x, width, 800, 1500));
            assert!(
                matches!(outcome, TapOutcome::ToggleChrome { .. }),
                "x={} width={} gave {:?}",
                x,
                width,
                outcome
            );
            assert_eq!(*nav.position(), before);
        }
    }
}

#[test]
fn deferred_render_replays_offset_on_resume() {
    let mut nav = Navigator::open(
        book_of(&[100, 100]),
        "book",
        MemoryStore::new(),
        TextSurface::detached(40),
    );
    assert!(nav.is_render_deferred());
    nav.on_tap(TapEvent::new(FORWARD_X, WIDTH, 800, 1500));
    assert_eq!(nav.position().viewport_offset, 760);

    nav.surface_mut().attach();
    assert!(nav.resume_rendering());
    assert_eq!(nav.surface().offset(), 0);
    assert_eq!(nav.position().pending_restore_offset, Some(760));

    let height = nav.surface().content_height();
    assert!(nav.restore_pending_offset(height));
    assert_eq!(nav.surface().offset(), nav.position().viewport_offset);
}

// =============================================================================
// Restore
// =============================================================================

#[test]
fn restore_twice_is_idempotent() {
    let mut store = MemoryStore::new();
    store.save("book", PositionRecord::new(1, 640)).unwrap();
    let mut nav = Navigator::open(book_of(&[100, 100]), "book", store, NullSurface::default());

    assert!(nav.restore_pending_offset(2000));
    let after_first = *nav.position();
    let writes = nav.store().write_count();

    assert!(!nav.restore_pending_offset(2000));
    assert_eq!(*nav.position(), after_first);
    assert_eq!(nav.store().write_count(), writes);
}

#[test]
fn restore_clamps_to_shorter_content() {
    let mut store = MemoryStore::new();
    store.save("book", PositionRecord::new(0, 5000)).unwrap();
    let mut nav = Navigator::open(book_of(&[100]), "book", store, NullSurface::default());
    assert!(nav.restore_pending_offset(1200));
    assert_eq!(nav.position().viewport_offset, 1200);
    assert_eq!(nav.progress(), 100);
}
