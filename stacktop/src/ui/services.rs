//! One row per watched service process or container.

use crate::providers::{container, process};
use crate::types::{ColorClass, MemUnit, MetricReading, ProviderKind};
use crate::ui::frame::{Line, Span, Tone};
use crate::ui::util::{gib, mib, pad_right};

pub const HEADING: &str = "Services";

pub fn heading() -> Line {
    Line::new(vec![Span::title(HEADING)])
}

fn resident(bytes: u64, units: MemUnit) -> String {
    match units {
        MemUnit::GiB => format!("{:.1}G", gib(bytes)),
        MemUnit::MiB => format!("{:.0}M", mib(bytes)),
    }
}

pub fn draw_service_row(
    label: &str,
    kind: ProviderKind,
    reading: &MetricReading,
    label_width: usize,
) -> Line {
    let color = match kind {
        ProviderKind::Process { color, .. } | ProviderKind::Container { color } => color,
        _ => ColorClass::default(),
    };
    let name = pad_right(label, label_width);

    let f = match reading {
        MetricReading::Available(f) => f,
        MetricReading::Unavailable { reason } => {
            return Line::new(vec![
                Span::dim("  ○ "),
                Span::dim(name),
                Span::dim(format!("  {reason}")),
            ]);
        }
    };

    let mut row = Line::new(vec![
        Span::new("  ● ", Tone::Accent(color)),
        Span::new(name, Tone::Accent(color)),
    ]);
    match kind {
        ProviderKind::Container { .. } => {
            let status = f.label(container::STATUS).unwrap_or("running");
            row.push(Span::plain(format!("  {status}")));
            if let Some(id) = f.label(container::ID) {
                row.push(Span::dim(format!("  {}", id.chars().take(12).collect::<String>())));
            }
        }
        ProviderKind::Process { units, .. } => {
            row.push(Span::plain("  running"));
            let cpu = f.number(process::CPU).unwrap_or(0.0);
            row.push(Span::plain(format!("  CPU {cpu:>6.1}%")));
            row.push(Span::plain(format!(
                "  RSS {:>6}",
                resident(f.bytes(process::RSS).unwrap_or(0), units)
            )));
            if let Some(pid) = f.number(process::PID) {
                row.push(Span::dim(format!("  pid {}", pid as u64)));
            }
        }
        _ => {}
    }
    row
}
