//! Error taxonomy for the editor.
//!
//! Every variant here is fatal: the caller unwinds to `main`, the raw-mode
//! session restores the terminal on the way out, and the process exits 1.
//! Malformed escape input is not represented here: the key decoder resolves
//! it locally to `Key::Esc`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to configure terminal: {0}")]
    TerminalConfig(#[source] io::Error),

    #[error("Failed to determine window size")]
    GeometryProbe,

    #[error("Failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
