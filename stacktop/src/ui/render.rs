//! Turns a snapshot into a fixed-layout frame.

use chrono::{DateTime, Local};

use crate::config::{Config, StatusThresholds};
use crate::types::{ProviderKind, Snapshot};
use crate::ui::frame::{Frame, Line, Span};
use crate::ui::header::{footer, header};
use crate::ui::services::{draw_service_row, heading};
use crate::ui::status::from_snapshot;
use crate::ui::{cpu::draw_cpu, gpu::draw_gpu, mem::draw_mem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Every line is padded or cut to this many columns.
    pub width: usize,
    pub gauge_width: usize,
    pub label_width: usize,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    layout: Layout,
    thresholds: StatusThresholds,
    interval_ms: u64,
    hostname: String,
}

impl Renderer {
    pub fn new(cfg: &Config, hostname: impl Into<String>) -> Self {
        Self {
            layout: Layout {
                width: cfg.width,
                gauge_width: cfg.gauge_width,
                label_width: cfg.label_width(),
            },
            thresholds: cfg.status,
            interval_ms: cfg.interval_ms,
            hostname: hostname.into(),
        }
    }

    /// Render `snap`. A frame shorter than `previous_line_count` is padded with
    /// blank lines so an in-place overwrite leaves nothing stale behind.
    pub fn render(&self, snap: &Snapshot, previous_line_count: usize, now: DateTime<Local>) -> Frame {
        let layout = &self.layout;
        let mut lines = header(&self.hostname, now, layout.width);

        let mut services_open = false;
        for e in snap.entries() {
            let title = e.id.as_str();
            match e.kind {
                ProviderKind::Gpu => lines.extend(draw_gpu(title, &e.reading, layout)),
                ProviderKind::Cpu => lines.extend(draw_cpu(title, &e.reading, layout)),
                ProviderKind::Memory => lines.extend(draw_mem(title, &e.reading, layout)),
                kind @ (ProviderKind::Process { .. } | ProviderKind::Container { .. }) => {
                    if !services_open {
                        lines.push(Line::blank());
                        lines.push(heading());
                        services_open = true;
                    }
                    lines.push(draw_service_row(title, kind, &e.reading, layout.label_width));
                }
            }
        }

        let status = from_snapshot(snap, &self.thresholds);
        lines.push(Line::blank());
        lines.push(Line::new(vec![
            Span::title("Status  "),
            Span::new("● ", status.tone()),
            Span::new(status.text(), status.tone()),
        ]));
        lines.extend(footer(self.interval_ms, layout.width));

        if lines.len() < previous_line_count {
            lines.resize(previous_line_count, Line::blank());
        }
        Frame::new(lines.into_iter().map(|l| l.fit(layout.width)).collect())
    }
}
