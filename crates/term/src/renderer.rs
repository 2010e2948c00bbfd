//! Terminal output: raw mode, alternate screen and frame flushing.
//!
//! A frame is encoded into one byte buffer and written with a single
//! `write_all`. The first frame, and any frame after a resize or
//! [`TerminalRenderer::invalidate`], repaints every row. Later frames only send
//! the spans that differ from what is already on screen.

use std::io::{self, Write};
use std::mem;

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Unchanged cells allowed inside one span.
///
/// Reprinting a short gap is cheaper than another cursor move, and the board
/// is drawn in 2-column cells, so a moving piece leaves gaps of 2 or 4 columns.
pub const MERGE_GAP: u16 = 4;

/// A horizontal run of cells to repaint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

impl Span {
    fn end(&self) -> u16 {
        self.x + self.len
    }
}

/// What one encoded frame cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub full: bool,
    pub spans: u32,
    pub cells: u32,
    pub bytes: usize,
}

/// Collect the spans of `next` that differ from `prev`, row by row.
///
/// Both frames must have the same dimensions. Changes separated by at most
/// [`MERGE_GAP`] unchanged cells share a span.
pub fn collect_spans(prev: &FrameBuffer, next: &FrameBuffer, spans: &mut Vec<Span>) {
    for y in 0..next.height() {
        let mut open: Option<Span> = None;
        for x in 0..next.width() {
            if prev.get(x, y) == next.get(x, y) {
                continue;
            }
            match open.as_mut() {
                Some(span) if x - span.end() <= MERGE_GAP => span.len = x + 1 - span.x,
                _ => {
                    if let Some(done) = open.replace(Span { x, y, len: 1 }) {
                        spans.push(done);
                    }
                }
            }
        }
        spans.extend(open);
    }
}

/// Turns framebuffers into crossterm command bytes.
///
/// Tracks the pen (last emitted style) so consecutive cells only emit the
/// colour or attribute that actually changed.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    pen: Option<CellStyle>,
    spans: Vec<Span>,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the screen and paint every row of `fb`
    pub fn full(&mut self, fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<FrameStats> {
        let start = out.len();
        self.pen = None;

        out.queue(terminal::Clear(terminal::ClearType::All))?;
        for y in 0..fb.height() {
            out.queue(cursor::MoveTo(0, y))?;
            self.print_cells(fb, 0, y, fb.width(), out)?;
        }
        self.finish(out)?;

        Ok(FrameStats {
            full: true,
            spans: fb.height() as u32,
            cells: fb.width() as u32 * fb.height() as u32,
            bytes: out.len() - start,
        })
    }

    /// Paint only what changed between `prev` and `next`.
    ///
    /// Falls back to [`FrameEncoder::full`] when the sizes differ. Identical
    /// frames encode to nothing.
    pub fn diff(
        &mut self,
        prev: &FrameBuffer,
        next: &FrameBuffer,
        out: &mut Vec<u8>,
    ) -> Result<FrameStats> {
        if prev.width() != next.width() || prev.height() != next.height() {
            return self.full(next, out);
        }

        let start = out.len();
        self.pen = None;

        let mut spans = mem::take(&mut self.spans);
        spans.clear();
        collect_spans(prev, next, &mut spans);

        let mut cells = 0u32;
        for span in &spans {
            out.queue(cursor::MoveTo(span.x, span.y))?;
            self.print_cells(next, span.x, span.y, span.len, out)?;
            cells += span.len as u32;
        }
        if !spans.is_empty() {
            self.finish(out)?;
        }

        let stats = FrameStats {
            full: false,
            spans: spans.len() as u32,
            cells,
            bytes: out.len() - start,
        };
        self.spans = spans;
        Ok(stats)
    }

    fn print_cells(
        &mut self,
        fb: &FrameBuffer,
        x: u16,
        y: u16,
        len: u16,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        for dx in 0..len {
            let cell = fb.get(x + dx, y).unwrap_or_default();
            self.set_pen(cell.style, out)?;
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn set_pen(&mut self, style: CellStyle, out: &mut Vec<u8>) -> Result<()> {
        let prev = match self.pen {
            Some(pen) if pen == style => return Ok(()),
            pen => pen,
        };

        // SGR 0 also drops colours, so both get re-sent after it.
        let attrs_changed = prev.map_or(true, |p| p.bold != style.bold || p.dim != style.dim);
        if attrs_changed {
            out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map_or(true, |p| p.fg != style.fg) {
            out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if attrs_changed || prev.map_or(true, |p| p.bg != style.bg) {
            out.queue(SetBackgroundColor(color(style.bg)))?;
        }

        self.pen = Some(style);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        self.pen = None;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Owns the real terminal while the game runs.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    encoder: FrameEncoder,
    /// What is on screen now; `None` forces a full repaint
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            encoder: FrameEncoder::new(),
            shown: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.buf.clear();
        self.buf
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.write_out()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.write_out()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        self.shown = None;
        Ok(())
    }

    /// Repaint everything on the next draw (after a resize)
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Put `fb` on screen, then hand back the previous frame's buffer in `fb`
    /// for the caller to render the next frame into.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<FrameStats> {
        self.buf.clear();
        let stats = match &self.shown {
            Some(shown) => self.encoder.diff(shown, fb, &mut self.buf)?,
            None => self.encoder.full(fb, &mut self.buf)?,
        };
        if stats.bytes > 0 {
            self.write_out()?;
        }

        match self.shown.as_mut() {
            Some(shown) => mem::swap(shown, fb),
            None => {
                let spare = FrameBuffer::new(fb.width(), fb.height());
                self.shown = Some(mem::replace(fb, spare));
            }
        }
        Ok(stats)
    }

    fn write_out(&mut self) -> Result<()> {
        self.stdout
            .write_all(&self.buf)
            .context("write frame to terminal")?;
        self.stdout.flush().context("flush terminal")?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}
