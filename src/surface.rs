//! Rendering surface port.
//!
//! The surface owns layout. It receives chapter HTML, later reports (through
//! the host) that layout finished, and scrolls when told to. Viewport and
//! content heights flow back into the navigator with each event rather than
//! being read from the surface.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use crate::error::ReaderError;

/// A host component able to display chapter content.
pub trait RenderSurface {
    /// Replace the displayed content with `html`.
    ///
    /// Returns [`ReaderError::RenderTargetUnavailable`] when the surface cannot
    /// take content yet. The navigator keeps the request and retries on
    /// [`Navigator::resume_rendering`](crate::navigator::Navigator::resume_rendering).
    fn load_content(&mut self, html: &str) -> Result<(), ReaderError>;

    /// Scroll the current content so `offset` is at the top of the viewport.
    fn scroll_to(&mut self, offset: u32);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn load_content(&mut self, html: &str) -> Result<(), ReaderError> {
        (**self).load_content(html)
    }

    fn scroll_to(&mut self, offset: u32) {
        (**self).scroll_to(offset)
    }
}

/// Presentation knobs applied when wrapping chapter HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleOptions {
    /// Body margin, as a percentage of the viewport.
    pub margin_percent: u8,
    /// CSS font family for the body.
    pub font_family: String,
    /// Body font size in CSS pixels.
    pub default_font_size: u16,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            margin_percent: 5,
            font_family: String::from("serif"),
            default_font_size: 20,
        }
    }
}

/// Wrap chapter markup in a minimal styled document.
pub fn wrap_chapter_html(body: &str, style: &StyleOptions) -> String {
    format!(
        "<html><body style='margin:{}%; font-family:{}; font-size:{}px;'>{}</body></html>",
        style.margin_percent, style.font_family, style.default_font_size, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_chapter_html_default_style() {
        let html = wrap_chapter_html("<p>Hi</p>", &StyleOptions::default());
        assert_eq!(
            html,
            "<html><body style='margin:5%; font-family:serif; font-size:20px;'><p>Hi</p></body></html>"
        );
    }

    #[test]
    fn test_wrap_chapter_html_custom_style() {
        let style = StyleOptions {
            margin_percent: 2,
            font_family: "monospace".into(),
            default_font_size: 14,
        };
        let html = wrap_chapter_html("x", &style);
        assert!(html.contains("margin:2%"));
        assert!(html.contains("font-family:monospace"));
        assert!(html.contains("font-size:14px"));
    }
}
