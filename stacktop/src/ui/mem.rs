//! Memory gauge.

use crate::providers::mem::{AVAILABLE, FREE, TOTAL, USAGE, USED};
use crate::types::MetricReading;
use crate::ui::frame::{Line, Span};
use crate::ui::gauge::bar;
use crate::ui::render::Layout;
use crate::ui::util::{fmt_bytes, used_of_total};

pub const LINES: usize = 3;

pub fn draw_mem(title: &str, reading: &MetricReading, layout: &Layout) -> Vec<Line> {
    let f = match reading {
        MetricReading::Available(f) => f,
        MetricReading::Unavailable { reason } => {
            return super::unavailable_block(title, reason, LINES, layout);
        }
    };

    let used = f.bytes(USED).unwrap_or(0);
    let total = f.bytes(TOTAL).unwrap_or(0);

    let mut gauge = Line::new(vec![Span::plain("  Used   ")]);
    gauge.spans.extend(bar(f.number(USAGE).unwrap_or(0.0), layout.gauge_width));
    gauge.push(Span::plain(format!("  {}", used_of_total(used, total))));

    let detail = Line::new(vec![
        Span::plain("  Free   "),
        Span::plain(format!("{:<8}", fmt_bytes(f.bytes(FREE).unwrap_or(0)))),
        Span::plain("Available  "),
        Span::plain(fmt_bytes(f.bytes(AVAILABLE).unwrap_or(0))),
    ]);

    vec![Line::new(vec![Span::title(title.to_string())]), gauge, detail]
}
