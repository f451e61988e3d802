//! Shared UI theme constants.

use crossterm::style::Color;

use crate::types::ColorClass;
use crate::ui::frame::Tone;

// Gauge colors by load band
pub const GAUGE_NORMAL: Color = Color::Green;
pub const GAUGE_WARNING: Color = Color::Yellow;
pub const GAUGE_ALERT: Color = Color::Red;

pub fn accent(c: ColorClass) -> Color {
    match c {
        ColorClass::Cyan => Color::Cyan,
        ColorClass::Green => Color::Green,
        ColorClass::Magenta => Color::Magenta,
        ColorClass::Blue => Color::Blue,
        ColorClass::Yellow => Color::Yellow,
    }
}

/// Foreground color for a tone; `None` for tones drawn with attributes only.
pub fn color(t: Tone) -> Option<Color> {
    match t {
        Tone::Normal => Some(GAUGE_NORMAL),
        Tone::Warning => Some(GAUGE_WARNING),
        Tone::Alert => Some(GAUGE_ALERT),
        Tone::Accent(c) => Some(accent(c)),
        Tone::Plain | Tone::Title | Tone::Dim => None,
    }
}
