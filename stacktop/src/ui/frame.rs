//! Structured frames (styled lines) and their serialization to the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::types::ColorClass;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Dim,
    Normal,
    Warning,
    Alert,
    Accent(ColorClass),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Dim)
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Title)
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Pad with spaces or cut so the line is exactly `width` columns.
    pub fn fit(mut self, width: usize) -> Self {
        let mut used = 0;
        let mut kept = Vec::with_capacity(self.spans.len() + 1);
        for mut span in self.spans.drain(..) {
            if used >= width {
                break;
            }
            let w = span.width();
            if used + w > width {
                span.text = span.text.chars().take(width - used).collect();
                used = width;
            } else {
                used += w;
            }
            kept.push(span);
        }
        if used < width {
            kept.push(Span::plain(" ".repeat(width - used)));
        }
        self.spans = kept;
        self
    }
}

/// One fully rendered dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<Line>,
}

impl Frame {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Frame text without any styling, one `\n` per line.
    pub fn to_plain(&self) -> String {
        let mut s = String::new();
        for l in &self.lines {
            s.push_str(&l.text());
            s.push('\n');
        }
        s
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub color: bool,
    /// Emit cursor movement and line clearing; off for one-shot output to pipes.
    pub cursor_control: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            color: true,
            cursor_control: true,
        }
    }
}

/// Queue `frame` on `out` and flush once. With `move_up > 0` the cursor first
/// goes back to the top of the previous frame so this one overwrites it.
pub fn write_frame<W: Write>(
    out: &mut W,
    frame: &Frame,
    move_up: usize,
    opts: WriteOptions,
) -> io::Result<()> {
    if opts.cursor_control && move_up > 0 {
        let n = u16::try_from(move_up).unwrap_or(u16::MAX);
        queue!(out, cursor::MoveUp(n), cursor::MoveToColumn(0))?;
    }
    for line in frame.lines() {
        for span in &line.spans {
            write_span(out, span, opts.color)?;
        }
        if opts.cursor_control {
            queue!(out, Clear(ClearType::UntilNewLine))?;
        }
        queue!(out, Print("\n"))?;
    }
    if opts.cursor_control {
        // Anything below a frame that got shorter
        queue!(out, Clear(ClearType::FromCursorDown))?;
    }
    out.flush()
}

fn write_span<W: Write>(out: &mut W, span: &Span, color: bool) -> io::Result<()> {
    if !color || span.tone == Tone::Plain {
        return queue!(out, Print(&span.text));
    }
    match span.tone {
        Tone::Title => queue!(out, SetAttribute(Attribute::Bold))?,
        Tone::Dim => queue!(out, SetAttribute(Attribute::Dim))?,
        tone => {
            if let Some(c) = theme::color(tone) {
                queue!(out, SetForegroundColor(c))?;
            }
        }
    }
    queue!(
        out,
        Print(&span.text),
        SetAttribute(Attribute::Reset),
        ResetColor
    )
}
