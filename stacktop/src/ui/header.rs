//! Top header with title, hostname and clock; bottom footer with help text.

use chrono::{DateTime, Local};

use crate::ui::frame::{Line, Span};

pub const HEADER_LINES: usize = 2;
pub const FOOTER_LINES: usize = 2;

pub fn header(hostname: &str, now: DateTime<Local>, width: usize) -> Vec<Line> {
    vec![
        Line::new(vec![
            Span::title(" stacktop"),
            Span::dim(" | local LLM stack | host: "),
            Span::plain(hostname.to_string()),
            Span::dim(" | "),
            Span::plain(now.format("%H:%M:%S").to_string()),
        ]),
        rule(width),
    ]
}

pub fn footer(interval_ms: u64, width: usize) -> Vec<Line> {
    let secs = interval_ms as f64 / 1000.0;
    vec![
        rule(width),
        Line::new(vec![Span::dim(format!(
            " Ctrl+C to exit | refresh every {secs}s"
        ))]),
    ]
}

pub fn rule(width: usize) -> Line {
    Line::new(vec![Span::dim("─".repeat(width))])
}
