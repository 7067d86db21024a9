//! The editor loop: render, decode one key, apply, repeat.

use std::io::Write;

use tracing::info;

use crate::core::geometry::{CursorPosition, WindowGeometry};
use crate::core::input::{ByteSource, Key, KeyDecoder};
use crate::document::Document;
use crate::error::Result;
use crate::ui::Screen;

/// Loop state. `Terminated` is entered once, on the quit key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated,
}

/// All editor state: window geometry, cursor, the loaded document and the
/// screen painter. Owned in one place and passed explicitly; no globals.
pub struct Editor {
    geometry: WindowGeometry,
    cursor: CursorPosition,
    document: Document,
    screen: Screen,
    status: Status,
}

impl Editor {
    pub fn new(geometry: WindowGeometry, document: Document) -> Self {
        Self {
            geometry,
            cursor: CursorPosition::default(),
            document,
            screen: Screen::new(),
            status: Status::Running,
        }
    }

    /// Run until the quit key terminates the loop.
    ///
    /// Each iteration renders the current frame and then decodes at most
    /// one key; a quiet poll comes straight back and re-renders. The final
    /// clear-and-restore happens in the terminal session teardown, after
    /// this returns.
    pub fn run<S, W>(&mut self, input: &mut S, out: &mut W) -> Result<()>
    where
        S: ByteSource,
        W: Write,
    {
        info!("editor loop started");
        while self.status == Status::Running {
            self.screen
                .render(&self.document, self.cursor, self.geometry, out)?;
            if let Some(key) = KeyDecoder::decode(input)? {
                self.process_key(key);
            }
        }
        info!("editor loop terminated");
        Ok(())
    }

    /// Apply one key event. Movement keys keep the cursor inside the
    /// window; everything else besides Ctrl-Q is inert in this immutable
    /// core.
    pub fn process_key(&mut self, key: Key) {
        match key {
            Key::Ctrl('q') => self.status = Status::Terminated,
            Key::Up | Key::Down | Key::Left | Key::Right => self.move_cursor(key),
            // A page movement is a full screen height of single-row steps,
            // clamped on each step.
            Key::PageUp => {
                for _ in 0..self.geometry.rows {
                    self.move_cursor(Key::Up);
                }
            }
            Key::PageDown => {
                for _ in 0..self.geometry.rows {
                    self.move_cursor(Key::Down);
                }
            }
            Key::Home => self.cursor.x = 0,
            Key::End => self.cursor.x = self.geometry.cols - 1,
            Key::Delete | Key::Esc | Key::Ctrl(_) | Key::Char(_) => {}
        }
    }

    fn move_cursor(&mut self, key: Key) {
        match key {
            Key::Left => self.cursor.x = self.cursor.x.saturating_sub(1),
            Key::Right => {
                if self.cursor.x + 1 < self.geometry.cols {
                    self.cursor.x += 1;
                }
            }
            Key::Up => self.cursor.y = self.cursor.y.saturating_sub(1),
            Key::Down => {
                if self.cursor.y + 1 < self.geometry.rows {
                    self.cursor.y += 1;
                }
            }
            _ => {}
        }
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn status(&self) -> Status {
        self.status
    }
}
