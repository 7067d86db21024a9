//! Key decoding for raw terminal input.
//!
//! Converts the raw byte stream into logical key events. A byte other than
//! ESC maps directly; ESC starts a bounded lookahead over at most three more
//! bytes, and the moment a read comes back empty the sequence resolves to
//! a plain Escape. Unrecognized sequences degrade to Escape as well; the
//! decoder never blocks indefinitely and never fails on malformed input.

use crate::error::Result;

/// A logical key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Printable character as typed.
    Char(char),
    /// Control-modified character: Ctrl+Q arrives as `Ctrl('q')`.
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Esc,
}

/// Supplies bytes under the bounded-timeout read discipline.
///
/// `Ok(None)` means nothing arrived within the window. The terminal session
/// implements this over its 100ms poll; tests script the stream.
pub trait ByteSource {
    fn next_byte(&mut self) -> Result<Option<u8>>;
}

/// Escape-sequence decoder over a byte source.
pub struct KeyDecoder;

impl KeyDecoder {
    /// Decode one key event.
    ///
    /// `Ok(None)` is an idle tick: no input arrived within the timeout, and
    /// control returns to the caller so it can re-render.
    pub fn decode<S: ByteSource>(source: &mut S) -> Result<Option<Key>> {
        let byte = match source.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        if byte != 0x1B {
            return Ok(Some(Self::plain_key(byte)));
        }

        // Two lookahead bytes, each under the same timeout. A quiet read
        // means the user pressed Escape itself.
        let first = match source.next_byte()? {
            Some(b) => b,
            None => return Ok(Some(Key::Esc)),
        };
        let second = match source.next_byte()? {
            Some(b) => b,
            None => return Ok(Some(Key::Esc)),
        };

        let key = match (first, second) {
            (b'[', b'0'..=b'9') => match source.next_byte()? {
                Some(b'~') => Self::tilde_key(second),
                _ => Key::Esc,
            },
            (b'[', final_byte) => Self::csi_key(final_byte),
            (b'O', b'H') => Key::Home,
            (b'O', b'F') => Key::End,
            _ => Key::Esc,
        };
        Ok(Some(key))
    }

    fn plain_key(byte: u8) -> Key {
        match byte {
            // Ctrl+A..Ctrl+Z occupy 0x01..0x1A.
            0x01..=0x1A => Key::Ctrl((byte - 1 + b'a') as char),
            _ => Key::Char(byte as char),
        }
    }

    /// Final byte of a `ESC [ X` sequence.
    fn csi_key(byte: u8) -> Key {
        match byte {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Esc,
        }
    }

    /// Digit of a `ESC [ <digit> ~` sequence (VT220-style keypad).
    fn tilde_key(digit: u8) -> Key {
        match digit {
            b'1' | b'7' => Key::Home,
            b'3' => Key::Delete,
            b'4' | b'8' => Key::End,
            b'5' => Key::PageUp,
            b'6' => Key::PageDown,
            _ => Key::Esc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Byte source driven by a script; `None` entries simulate a read that
    /// timed out, and an exhausted script stays quiet forever.
    struct ScriptedBytes {
        events: VecDeque<Option<u8>>,
    }

    impl ScriptedBytes {
        fn new(events: &[Option<u8>]) -> Self {
            Self {
                events: events.iter().copied().collect(),
            }
        }

        fn bytes(bytes: &[u8]) -> Self {
            Self {
                events: bytes.iter().map(|b| Some(*b)).collect(),
            }
        }
    }

    impl ByteSource for ScriptedBytes {
        fn next_byte(&mut self) -> Result<Option<u8>> {
            Ok(self.events.pop_front().unwrap_or(None))
        }
    }

    fn decode_one(bytes: &[u8]) -> Option<Key> {
        KeyDecoder::decode(&mut ScriptedBytes::bytes(bytes)).unwrap()
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(decode_one(b"a"), Some(Key::Char('a')));
        assert_eq!(decode_one(b"Z"), Some(Key::Char('Z')));
        assert_eq!(decode_one(b" "), Some(Key::Char(' ')));
        assert_eq!(decode_one(b"~"), Some(Key::Char('~')));
    }

    #[test]
    fn test_control_chars() {
        // Ctrl+Q = 0x11
        assert_eq!(decode_one(&[0x11]), Some(Key::Ctrl('q')));
        // Ctrl+C = 0x03
        assert_eq!(decode_one(&[0x03]), Some(Key::Ctrl('c')));
        assert_eq!(decode_one(&[0x01]), Some(Key::Ctrl('a')));
        assert_eq!(decode_one(&[0x1A]), Some(Key::Ctrl('z')));
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(decode_one(b"\x1b[A"), Some(Key::Up));
        assert_eq!(decode_one(b"\x1b[B"), Some(Key::Down));
        assert_eq!(decode_one(b"\x1b[C"), Some(Key::Right));
        assert_eq!(decode_one(b"\x1b[D"), Some(Key::Left));
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(decode_one(b"\x1b[H"), Some(Key::Home));
        assert_eq!(decode_one(b"\x1b[F"), Some(Key::End));
        assert_eq!(decode_one(b"\x1bOH"), Some(Key::Home));
        assert_eq!(decode_one(b"\x1bOF"), Some(Key::End));
        assert_eq!(decode_one(b"\x1b[1~"), Some(Key::Home));
        assert_eq!(decode_one(b"\x1b[7~"), Some(Key::Home));
        assert_eq!(decode_one(b"\x1b[4~"), Some(Key::End));
        assert_eq!(decode_one(b"\x1b[8~"), Some(Key::End));
    }

    #[test]
    fn test_page_and_delete_keys() {
        assert_eq!(decode_one(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode_one(b"\x1b[6~"), Some(Key::PageDown));
        assert_eq!(decode_one(b"\x1b[3~"), Some(Key::Delete));
    }

    #[test]
    fn test_lone_escape_times_out() {
        // ESC followed by silence is Escape itself.
        let mut source = ScriptedBytes::new(&[Some(0x1B), None]);
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), Some(Key::Esc));

        // ESC [ with no final byte also resolves to Escape.
        let mut source = ScriptedBytes::new(&[Some(0x1B), Some(b'['), None]);
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), Some(Key::Esc));
    }

    #[test]
    fn test_truncated_tilde_sequence() {
        // Digit with no trailing byte.
        assert_eq!(decode_one(b"\x1b[5"), Some(Key::Esc));
        // Digit with a wrong trailing byte.
        assert_eq!(decode_one(b"\x1b[5x"), Some(Key::Esc));
        // Unmapped digit.
        assert_eq!(decode_one(b"\x1b[9~"), Some(Key::Esc));
        assert_eq!(decode_one(b"\x1b[0~"), Some(Key::Esc));
    }

    #[test]
    fn test_unknown_sequences_degrade() {
        assert_eq!(decode_one(b"\x1b[Z"), Some(Key::Esc));
        assert_eq!(decode_one(b"\x1bOx"), Some(Key::Esc));
        assert_eq!(decode_one(b"\x1bxy"), Some(Key::Esc));
    }

    #[test]
    fn test_idle_tick() {
        let mut source = ScriptedBytes::new(&[None]);
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), None);
    }

    #[test]
    fn test_sequences_back_to_back() {
        let mut source = ScriptedBytes::bytes(b"\x1b[Aq\x1b[5~");
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), Some(Key::Up));
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), Some(Key::Char('q')));
        assert_eq!(KeyDecoder::decode(&mut source).unwrap(), Some(Key::PageUp));
    }
}
