//! Proportional bar gauges.

use crate::ui::frame::{Span, Tone};

/// Above this a gauge turns red.
pub const ALERT_ABOVE: f64 = 80.0;
/// Above this (up to `ALERT_ABOVE`) a gauge turns yellow.
pub const WARNING_ABOVE: f64 = 50.0;

const FILLED: char = '█';
const EMPTY: char = ' ';

/// `p` limited to 0..=100; NaN and negative zero read as 0.
pub fn clamp_pct(p: f64) -> f64 {
    if p.is_nan() || p <= 0.0 {
        0.0
    } else {
        p.clamp(0.0, 100.0)
    }
}

/// Filled cells of a `width`-cell gauge: floor(clamp(p) * width / 100).
pub fn filled_cells(p: f64, width: usize) -> usize {
    let cells = (clamp_pct(p) * width as f64 / 100.0).floor() as usize;
    cells.min(width)
}

pub fn tone_for(p: f64) -> Tone {
    let p = clamp_pct(p);
    if p > ALERT_ABOVE {
        Tone::Alert
    } else if p > WARNING_ABOVE {
        Tone::Warning
    } else {
        Tone::Normal
    }
}

/// `[█████     ]  50%`: bar plus the percentage right-justified to 3 digits.
pub fn bar(p: f64, width: usize) -> Vec<Span> {
    let p = clamp_pct(p);
    let filled = filled_cells(p, width);
    vec![
        Span::dim("["),
        Span::new(FILLED.to_string().repeat(filled), tone_for(p)),
        Span::plain(EMPTY.to_string().repeat(width - filled)),
        Span::dim("]"),
        Span::plain(format!(" {:>3.0}%", p.floor())),
    ]
}
