//! UI module root: section renderers, gauges and frame serialization.

pub mod cpu;
pub mod frame;
pub mod gauge;
pub mod gpu;
pub mod header;
pub mod mem;
pub mod render;
pub mod services;
pub mod status;
pub mod theme;
pub mod util;

use frame::{Line, Span};
use render::Layout;
use util::truncate_middle;

/// Same height as the available block so the frame never changes size.
fn unavailable_block(title: &str, reason: &str, height: usize, layout: &Layout) -> Vec<Line> {
    let mut lines = vec![
        Line::new(vec![
            Span::title(title.to_string()),
            Span::dim("  unavailable"),
        ]),
        Line::new(vec![Span::dim(format!(
            "  {}",
            truncate_middle(reason, layout.width.saturating_sub(2))
        ))]),
    ];
    lines.resize(height.max(1), Line::blank());
    lines
}
