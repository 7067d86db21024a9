//! Frame rendering through a single buffered write.
//!
//! Every frame is accumulated in a `RenderBuffer` and pushed to the
//! terminal as exactly one write. Partial writes of a frame show up as
//! tearing, so the single-flush cycle is a correctness requirement here,
//! not an optimization.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::geometry::{CursorPosition, WindowGeometry};
use crate::document::Document;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pre-allocated buffer for building a frame of ANSI sequences.
///
/// Append-only between flushes; `flush_to` hands the accumulated bytes to
/// the terminal in one write.
pub struct RenderBuffer {
    data: Vec<u8>,
}

impl RenderBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// A buffer sized for a typical terminal frame.
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Discard the previous frame's contents.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Flush the frame to a writer in a single write.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// Terminal commands are queued into the buffer through `io::Write`.
impl Write for RenderBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Paints the visible window into a `RenderBuffer` each cycle.
pub struct Screen {
    buffer: RenderBuffer,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            buffer: RenderBuffer::new(),
        }
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Render one frame: hide the cursor, repaint every visible row from
    /// the origin, reposition to the logical cursor, show it again, and
    /// flush the whole thing as one write.
    pub fn render<W: Write>(
        &mut self,
        document: &Document,
        cursor: CursorPosition,
        geometry: WindowGeometry,
        out: &mut W,
    ) -> io::Result<()> {
        self.buffer.clear();
        queue!(self.buffer, Hide, MoveTo(0, 0))?;
        self.draw_rows(document, geometry)?;
        queue!(self.buffer, MoveTo(cursor.x, cursor.y), Show)?;
        self.buffer.flush_to(out)
    }

    fn draw_rows(&mut self, document: &Document, geometry: WindowGeometry) -> io::Result<()> {
        let width = geometry.cols as usize;
        for y in 0..geometry.rows {
            if let Some(row) = document.row(y as usize) {
                queue!(self.buffer, Print(clip_to_width(row.text(), width)))?;
            } else if document.is_empty() && y == geometry.rows / 3 {
                self.draw_welcome(geometry)?;
            } else {
                self.buffer.write_raw(b"~");
            }

            queue!(self.buffer, Clear(ClearType::UntilNewLine))?;
            // No line break after the final row: the terminal would scroll.
            if y + 1 < geometry.rows {
                self.buffer.write_raw(b"\r\n");
            }
        }
        Ok(())
    }

    /// Centered one-line banner, shown only on an empty document.
    fn draw_welcome(&mut self, geometry: WindowGeometry) -> io::Result<()> {
        let message = format!("femto editor -- version {VERSION}");
        let message = clip_to_width(&message, geometry.cols as usize);
        let padding = (geometry.cols as usize).saturating_sub(message.width()) / 2;
        if padding > 0 {
            self.buffer.write_raw(b"~");
            for _ in 1..padding {
                self.buffer.write_raw(b" ");
            }
        }
        queue!(self.buffer, Print(message))?;
        Ok(())
    }
}

/// Clip text to at most `max` display columns, never splitting a wide
/// character in half.
fn clip_to_width(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            return &text[..idx];
        }
        used += w;
    }
    text
}
