//! Core terminal plumbing.
//!
//! This module contains the low-level terminal control logic:
//!
//! - **tty**: raw-mode session over the controlling terminal (termios
//!   snapshot/restore, bounded-timeout byte reads)
//! - **geometry**: window size probe with cursor-report fallback
//! - **input**: raw byte stream to logical key decoding
//!
//! # Architecture
//!
//! ```text
//! Editor
//! ├── Tty (raw mode + 100ms bounded reads)
//! │     └── KeyDecoder (escape-sequence state machine)
//! └── Screen
//!       └── RenderBuffer (one write per frame)
//! ```

pub mod geometry;
pub mod input;
pub mod tty;
