//! Terminal rendering surface.
//!
//! Strips chapter markup down to paragraphs of plain text, wraps them to a
//! fixed column width and exposes one line per surface unit. Layout happens
//! synchronously inside [`RenderSurface::load_content`], so the host can call
//! [`Navigator::restore_pending_offset`](crate::navigator::Navigator::restore_pending_offset)
//! right after a chapter change.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ReaderError;
use crate::surface::RenderSurface;

/// Plain-text surface with line-granular scrolling.
#[derive(Clone, Debug)]
pub struct TextSurface {
    width: usize,
    lines: Vec<String>,
    offset: u32,
    attached: bool,
}

impl TextSurface {
    /// Attached surface wrapping at `width` columns (minimum 8).
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(8),
            lines: Vec::new(),
            offset: 0,
            attached: true,
        }
    }

    /// Surface that refuses content until [`attach`](Self::attach) is called.
    pub fn detached(width: usize) -> Self {
        Self {
            attached: false,
            ..Self::new(width)
        }
    }

    /// Allow the surface to accept content.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Wrap width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rendered height of the current content, in lines.
    pub fn content_height(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Current scroll offset, in lines.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// All wrapped lines of the current content.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines inside a viewport of `height` lines at the current offset.
    pub fn visible(&self, height: u32) -> &[String] {
        let start = (self.offset as usize).min(self.lines.len());
        let end = start.saturating_add(height as usize).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Whether the viewport top sits at the start of the content.
    pub fn at_top(&self) -> bool {
        self.offset == 0
    }

    /// Whether a viewport of `height` lines reaches the end of the content.
    pub fn at_bottom(&self, height: u32) -> bool {
        self.offset.saturating_add(height) >= self.content_height()
    }
}

impl RenderSurface for TextSurface {
    fn load_content(&mut self, html: &str) -> Result<(), ReaderError> {
        if !self.attached {
            return Err(ReaderError::RenderTargetUnavailable);
        }
        let mut text = String::new();
        if let Err(err) = extract_paragraphs(html.as_bytes(), &mut text) {
            log::warn!("Chapter markup not fully parsed, showing partial text: {}", err);
        }
        self.lines = wrap_paragraphs(&text, self.width);
        self.offset = 0;
        Ok(())
    }

    fn scroll_to(&mut self, offset: u32) {
        self.offset = offset.min(self.content_height());
    }
}

fn is_skipped_tag(name: &str) -> bool {
    matches!(name, "script" | "style" | "head" | "title" | "noscript")
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "div" | "li" | "br" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "tr"
    )
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    if result.ends_with(' ') {
        result.pop();
    }
    result
}

fn flush_paragraph(out: &mut String, pending: &mut String) {
    let text = collapse_whitespace(pending);
    pending.clear();
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&text);
}

fn resolve_entity(name: &str) -> String {
    let entity = format!("&{};", name);
    match quick_xml::escape::unescape_with(&entity, |n| match n {
        "nbsp" => Some(" "),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "hellip" => Some("\u{2026}"),
        "rsquo" => Some("\u{2019}"),
        "lsquo" => Some("\u{2018}"),
        "rdquo" => Some("\u{201d}"),
        "ldquo" => Some("\u{201c}"),
        _ => None,
    }) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!("&{};", name),
    }
}

/// Pull block-separated text out of (X)HTML. One paragraph per line.
fn extract_paragraphs(html: &[u8], out: &mut String) -> Result<(), ReaderError> {
    let mut reader = Reader::from_reader(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut buf = Vec::new();
    let mut pending = String::new();
    let mut skip_depth = 0usize;

    let result = loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if is_skipped_tag(&name) {
                    skip_depth += 1;
                } else if skip_depth == 0 && is_block_tag(&name) {
                    flush_paragraph(out, &mut pending);
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if skip_depth == 0 && is_block_tag(&name) {
                    flush_paragraph(out, &mut pending);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if is_skipped_tag(&name) {
                    skip_depth = skip_depth.saturating_sub(1);
                } else if skip_depth == 0 && is_block_tag(&name) {
                    flush_paragraph(out, &mut pending);
                }
            }
            Ok(Event::Text(e)) if skip_depth == 0 => {
                pending.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::CData(e)) if skip_depth == 0 => {
                pending.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::GeneralRef(e)) if skip_depth == 0 => {
                if let Ok(name) = e.decode() {
                    pending.push_str(&resolve_entity(&name));
                }
            }
            Ok(Event::Eof) => break Ok(()),
            Ok(_) => {}
            Err(err) => break Err(ReaderError::Parse(format!("XML error: {:?}", err))),
        }
        buf.clear();
    };

    flush_paragraph(out, &mut pending);
    result
}

fn wrap_paragraphs(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n').filter(|p| !p.trim().is_empty()) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let mut line = String::new();
        let mut line_chars = 0usize;
        for word in paragraph.split_whitespace() {
            let word_chars = word.chars().count();
            if line_chars > 0 && line_chars + 1 + word_chars > width {
                lines.push(core::mem::take(&mut line));
                line_chars = 0;
            }
            if line_chars > 0 {
                line.push(' ');
                line_chars += 1;
            }
            line.push_str(word);
            line_chars += word_chars;
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_paragraphs_skips_head_and_style() {
        let html = "<html><head><title>T</title><style>p{}</style></head>\
                    <body><p>First  para.</p><p>Second</p></body></html>";
        let mut out = String::new();
        extract_paragraphs(html.as_bytes(), &mut out).unwrap();
        assert_eq!(out, "First para.\nSecond");
    }

    #[test]
    fn test_extract_paragraphs_resolves_entities() {
        let mut out = String::new();
        extract_paragraphs(b"<p>Barnes &amp; Noble</p>", &mut out).unwrap();
        assert_eq!(out, "Barnes & Noble");
    }

    #[test]
    fn test_unknown_entity_is_kept_verbatim() {
        assert_eq!(resolve_entity("bogus"), "&bogus;");
        assert_eq!(resolve_entity("nbsp"), " ");
    }

    #[test]
    fn test_wrap_paragraphs_respects_width() {
        let lines = wrap_paragraphs("one two three four five\nsix", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "", "six"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_load_content_sets_height_and_resets_offset() {
        let mut surface = TextSurface::new(20);
        surface.load_content("<p>alpha</p><p>beta</p><p>gamma</p>").unwrap();
        assert_eq!(surface.content_height(), 5);
        surface.scroll_to(3);
        assert_eq!(surface.visible(2), ["", "gamma"]);
        surface.load_content("<p>new</p>").unwrap();
        assert_eq!(surface.offset(), 0);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut surface = TextSurface::new(20);
        surface.load_content("<p>a</p>").unwrap();
        surface.scroll_to(50);
        assert_eq!(surface.offset(), 1);
        assert!(surface.visible(10).is_empty());
        assert!(surface.at_bottom(10));
    }

    #[test]
    fn test_detached_surface_is_unavailable() {
        let mut surface = TextSurface::detached(20);
        let err = surface.load_content("<p>a</p>").unwrap_err();
        assert_eq!(err, ReaderError::RenderTargetUnavailable);
        surface.attach();
        assert!(surface.load_content("<p>a</p>").is_ok());
    }

    #[test]
    fn test_mismatched_html_tags_do_not_abort() {
        let mut surface = TextSurface::new(40);
        surface
            .load_content("<p>open<b>bold</p><p>next</p>")
            .unwrap();
        assert!(surface.lines().iter().any(|l| l.contains("next")));
    }
}
