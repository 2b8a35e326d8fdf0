//! Status line shown under the reading surface.

extern crate alloc;

use alloc::string::String;
use core::fmt;

use chrono::NaiveTime;

/// Clock, battery and progress, ready for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Wall-clock time supplied by the host.
    pub clock: NaiveTime,
    /// Battery charge in percent, when the host can read it.
    pub battery_percent: Option<u8>,
    /// Whole-book completion percentage.
    pub percent: u8,
}

impl StatusLine {
    /// Render as `"9:05 AM  |  85%  |  42% Complete"`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  |  ", self.clock.format("%-I:%M %p"))?;
        match self.battery_percent {
            Some(level) => write!(f, "{}%", level)?,
            None => write!(f, "--%")?,
        }
        write!(f, "  |  {}% Complete", self.percent)
    }
}
