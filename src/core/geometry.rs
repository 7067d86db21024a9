//! Window geometry probing.
//!
//! The primary path asks the kernel for the window size. Terminals that
//! report zero columns (or refuse the query entirely) get the classic
//! fallback: push the cursor to the far bottom-right corner, issue a
//! cursor-position query, and parse the `ESC [ rows ; cols R` reply that
//! comes back on the input stream.

use std::io::{self, Write};

use crate::core::input::ByteSource;
use crate::core::tty::Tty;
use crate::error::{EditorError, Result};

/// Terminal window size, immutable for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowGeometry {
    pub rows: u16,
    pub cols: u16,
}

/// Cursor position in screen cells, zero-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: u16,
    pub y: u16,
}

/// Determine the window size, or fail fatally if neither the kernel query
/// nor the cursor-report fallback produces one.
pub fn probe(tty: &mut Tty) -> Result<WindowGeometry> {
    if let Some((cols, rows)) = tty.window_size() {
        if cols > 0 && rows > 0 {
            return Ok(WindowGeometry { rows, cols });
        }
    }
    let mut stdout = io::stdout();
    probe_via_cursor_report(tty, &mut stdout)
}

/// Fallback probe: move the cursor far bottom-right (the terminal clamps
/// the move to its edge), ask for the position, read the reply.
fn probe_via_cursor_report<S, W>(source: &mut S, out: &mut W) -> Result<WindowGeometry>
where
    S: ByteSource,
    W: Write,
{
    out.write_all(b"\x1b[999C\x1b[999B")?;
    out.write_all(b"\x1b[6n")?;
    out.flush()?;

    let mut reply = Vec::with_capacity(16);
    while reply.len() < 32 {
        match source.next_byte()? {
            Some(byte) => {
                reply.push(byte);
                if byte == b'R' {
                    break;
                }
            }
            // The terminal stopped answering; whatever arrived is all
            // there is.
            None => break,
        }
    }

    parse_cursor_report(&reply).ok_or(EditorError::GeometryProbe)
}

/// Parse a cursor-position report of the form `ESC [ <rows> ; <cols> R`.
fn parse_cursor_report(reply: &[u8]) -> Option<WindowGeometry> {
    let body = reply.strip_prefix(b"\x1b[")?.strip_suffix(b"R")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.trim().parse().ok()?;
    let cols: u16 = cols.trim().parse().ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(WindowGeometry { rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedBytes {
        events: VecDeque<Option<u8>>,
    }

    impl ScriptedBytes {
        fn bytes(bytes: &[u8]) -> Self {
            Self {
                events: bytes.iter().map(|b| Some(*b)).collect(),
            }
        }

        fn silent() -> Self {
            Self {
                events: VecDeque::new(),
            }
        }
    }

    impl ByteSource for ScriptedBytes {
        fn next_byte(&mut self) -> Result<Option<u8>> {
            Ok(self.events.pop_front().unwrap_or(None))
        }
    }

    #[test]
    fn test_parse_cursor_report() {
        assert_eq!(
            parse_cursor_report(b"\x1b[24;80R"),
            Some(WindowGeometry { rows: 24, cols: 80 })
        );
        assert_eq!(
            parse_cursor_report(b"\x1b[150;392R"),
            Some(WindowGeometry { rows: 150, cols: 392 })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_reports() {
        assert_eq!(parse_cursor_report(b""), None);
        assert_eq!(parse_cursor_report(b"[24;80R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24;80"), None);
        assert_eq!(parse_cursor_report(b"\x1b[2480R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[a;bR"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24;0R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[0;80R"), None);
    }

    #[test]
    fn test_fallback_parses_simulated_reply() {
        let mut source = ScriptedBytes::bytes(b"\x1b[24;80R");
        let mut out = Vec::new();

        let geometry = probe_via_cursor_report(&mut source, &mut out).unwrap();
        assert_eq!(geometry, WindowGeometry { rows: 24, cols: 80 });

        // The query itself must have gone out: bottom-right push, then DSR.
        let sent = String::from_utf8(out).unwrap();
        assert!(sent.contains("\x1b[999C\x1b[999B"));
        assert!(sent.ends_with("\x1b[6n"));
    }

    #[test]
    fn test_fallback_fails_when_terminal_is_silent() {
        let mut source = ScriptedBytes::silent();
        let mut out = Vec::new();
        assert!(matches!(
            probe_via_cursor_report(&mut source, &mut out),
            Err(EditorError::GeometryProbe)
        ));
    }

    #[test]
    fn test_fallback_fails_on_garbage_reply() {
        let mut source = ScriptedBytes::bytes(b"hello worldR");
        let mut out = Vec::new();
        assert!(matches!(
            probe_via_cursor_report(&mut source, &mut out),
            Err(EditorError::GeometryProbe)
        ));
    }
}
