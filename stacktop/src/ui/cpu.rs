//! CPU usage gauge and load averages.

use crate::providers::cpu::{CORES, LOAD_1, LOAD_15, LOAD_5, MODEL, USAGE};
use crate::types::MetricReading;
use crate::ui::frame::{Line, Span};
use crate::ui::gauge::bar;
use crate::ui::render::Layout;
use crate::ui::util::truncate_middle;

pub const LINES: usize = 3;

pub fn draw_cpu(title: &str, reading: &MetricReading, layout: &Layout) -> Vec<Line> {
    let f = match reading {
        MetricReading::Available(f) => f,
        MetricReading::Unavailable { reason } => {
            return super::unavailable_block(title, reason, LINES, layout);
        }
    };

    let cores = f.number(CORES).unwrap_or(0.0) as u64;
    let suffix = format!("  ({cores} cores)");
    let room = layout
        .width
        .saturating_sub(title.len() + 2 + suffix.len());
    let head = Line::new(vec![
        Span::title(title.to_string()),
        Span::plain("  "),
        Span::dim(truncate_middle(f.label(MODEL).unwrap_or("unknown"), room)),
        Span::dim(suffix),
    ]);

    let mut usage = Line::new(vec![Span::plain("  Usage  ")]);
    usage.spans.extend(bar(f.number(USAGE).unwrap_or(0.0), layout.gauge_width));

    let load = Line::new(vec![
        Span::plain("  Load   "),
        Span::plain(format!(
            "{:.2}  {:.2}  {:.2}",
            f.number(LOAD_1).unwrap_or(0.0),
            f.number(LOAD_5).unwrap_or(0.0),
            f.number(LOAD_15).unwrap_or(0.0)
        )),
        Span::dim("  (1m 5m 15m)"),
    ]);

    vec![head, usage, load]
}
