use crate::providers::gpu::{MEM_PCT, MEM_TOTAL, MEM_USED, NAME, POWER_DRAW, POWER_LIMIT, TEMP, UTIL};
use crate::types::MetricReading;
use crate::ui::frame::{Line, Span};
use crate::ui::gauge::bar;
use crate::ui::render::Layout;
use crate::ui::util::{fmt_bytes, truncate_middle};

pub const LINES: usize = 4;

pub fn draw_gpu(title: &str, reading: &MetricReading, layout: &Layout) -> Vec<Line> {
    let f = match reading {
        MetricReading::Available(f) => f,
        MetricReading::Unavailable { reason } => {
            return super::unavailable_block(title, reason, LINES, layout);
        }
    };

    let name = f.label(NAME).unwrap_or("unknown");
    let head = Line::new(vec![
        Span::title(title.to_string()),
        Span::plain("  "),
        Span::dim(truncate_middle(name, layout.width.saturating_sub(title.len() + 2))),
    ]);

    let mut util = Line::new(vec![Span::plain("  Util   ")]);
    util.spans.extend(bar(f.number(UTIL).unwrap_or(0.0), layout.gauge_width));

    let mut vram = Line::new(vec![Span::plain("  VRAM   ")]);
    vram.spans.extend(bar(f.number(MEM_PCT).unwrap_or(0.0), layout.gauge_width));
    vram.push(Span::plain(format!(
        "  {} / {}",
        fmt_bytes(f.bytes(MEM_USED).unwrap_or(0)),
        fmt_bytes(f.bytes(MEM_TOTAL).unwrap_or(0))
    )));

    let temp = f
        .number(TEMP)
        .map(|t| format!("{t:.0}°C"))
        .unwrap_or_else(|| "n/a".into());
    let power = match (f.number(POWER_DRAW), f.number(POWER_LIMIT)) {
        (Some(d), Some(l)) => format!("{d:.1}W / {l:.1}W"),
        (Some(d), None) => format!("{d:.1}W"),
        _ => "n/a".into(),
    };
    let sensors = Line::new(vec![
        Span::plain("  Temp   "),
        Span::plain(format!("{temp:<8}")),
        Span::plain("Power  "),
        Span::plain(power),
    ]);

    vec![head, util, vram, sensors]
}
