//! Screen rendering.
//!
//! - **render**: append-only frame buffer flushed as a single write, and
//!   the screen painter that fills it each cycle

pub mod render;

pub use render::{RenderBuffer, Screen};
