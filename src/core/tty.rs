//! Raw-mode session over the controlling terminal.
//!
//! `Tty` owns the terminal file descriptor and the original attribute
//! snapshot. Entering raw mode disables echo, canonical buffering, signal
//! keys, CR translation, output post-processing, parity/strip handling and
//! flow control, and configures reads to return after one byte or 100ms,
//! whichever comes first. Dropping the session clears the screen and puts
//! the attributes back, so the surrounding shell is never left in raw mode.

use std::fs::File;
use std::io::{self, Write};

use rustix::fd::{AsFd, BorrowedFd};
use rustix::termios::{
    self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex,
    Termios,
};

use crate::core::input::ByteSource;
use crate::error::{EditorError, Result};

/// The controlling terminal: stdin when it is a tty, `/dev/tty` otherwise
/// (stdin may be redirected, e.g. `femto file < /dev/null`).
enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            TerminalFd::Stdin(stdin) => stdin.as_fd(),
            TerminalFd::DevTty(file) => file.as_fd(),
        }
    }
}

/// Raw-mode terminal session.
///
/// At most one snapshot exists per session; `restore` consumes it, so the
/// restore that runs on drop is idempotent even if an explicit restore
/// already happened.
pub struct Tty {
    fd: TerminalFd,
    saved: Option<Termios>,
}

impl Tty {
    /// Open the controlling terminal without changing any attributes.
    pub fn open() -> Result<Self> {
        let stdin = io::stdin();
        let fd = if termios::isatty(&stdin) {
            TerminalFd::Stdin(stdin)
        } else {
            let file = File::options()
                .read(true)
                .write(true)
                .open("/dev/tty")
                .map_err(EditorError::TerminalConfig)?;
            TerminalFd::DevTty(file)
        };
        Ok(Self { fd, saved: None })
    }

    /// Snapshot the current attributes and install raw mode.
    pub fn enter_raw_mode(&mut self) -> Result<()> {
        let mut raw = termios::tcgetattr(&self.fd)
            .map_err(|e| EditorError::TerminalConfig(e.into()))?;
        let saved = raw.clone();

        raw.input_modes &= !(InputModes::BRKINT
            | InputModes::ICRNL
            | InputModes::INPCK
            | InputModes::ISTRIP
            | InputModes::IXON);
        raw.output_modes &= !OutputModes::OPOST;
        raw.control_modes |= ControlModes::CS8;
        raw.local_modes &=
            !(LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG);

        // Poll semantics: read returns after 1 byte or 100ms.
        raw.special_codes[SpecialCodeIndex::VMIN] = 0;
        raw.special_codes[SpecialCodeIndex::VTIME] = 1;

        termios::tcsetattr(&self.fd, OptionalActions::Flush, &raw)
            .map_err(|e| EditorError::TerminalConfig(e.into()))?;
        self.saved = Some(saved);
        Ok(())
    }

    /// Restore the snapshot taken by `enter_raw_mode`. No-op if raw mode
    /// was never entered or was already restored.
    pub fn restore(&mut self) -> Result<()> {
        if let Some(saved) = self.saved.take() {
            termios::tcsetattr(&self.fd, OptionalActions::Flush, &saved)
                .map_err(|e| EditorError::TerminalConfig(e.into()))?;
        }
        Ok(())
    }

    /// One bounded read: `Ok(None)` when nothing arrived within the 100ms
    /// window. EOF and interrupted reads are folded into the same quiet
    /// result; the caller polls again on its next iteration.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match rustix::io::read(&self.fd, &mut buf[..]) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e == rustix::io::Errno::INTR => Ok(None),
            Err(e) => Err(EditorError::Io(e.into())),
        }
    }

    /// Kernel-reported window size as (cols, rows), if the query succeeds.
    pub fn window_size(&self) -> Option<(u16, u16)> {
        termios::tcgetwinsize(&self.fd)
            .ok()
            .map(|ws| (ws.ws_col, ws.ws_row))
    }
}

impl ByteSource for Tty {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        self.read_byte()
    }
}

impl Drop for Tty {
    fn drop(&mut self) {
        // Clear the raw-mode screen before the attributes come back, then
        // restore. Both are best-effort on this path.
        if self.saved.is_some() {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x1b[2J");
            let _ = stdout.write_all(b"\x1b[H");
            let _ = stdout.flush();
        }
        let _ = self.restore();
    }
}
