//! femto - A minimal full-screen terminal editor
//!
//! femto puts the controlling terminal into raw mode, decodes raw input
//! bytes (including multi-byte escape sequences) into logical key events,
//! and renders a cursor-addressed view of a document through a single
//! buffered write per frame.
//!
//! # Quick Start
//!
//! ```text
//! femto              # start with an empty document
//! femto notes.txt    # load the first line of notes.txt
//! ```
//!
//! # Keybindings
//!
//! | Key | Action |
//! |-----|--------|
//! | Arrow keys | Move the cursor |
//! | PgUp / PgDn | Move a full screen height |
//! | Home / End | Jump to the first / last column |
//! | Ctrl+Q | Quit |

mod core;
mod document;
mod editor;
mod error;
mod ui;

use std::env;
use std::io;
use std::path::PathBuf;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::core::geometry;
use crate::core::tty::Tty;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::Result;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line arguments
struct Args {
    /// Optional document to load (first line only)
    path: Option<PathBuf>,
}

fn print_version() {
    eprintln!("femto {}", VERSION);
}

fn print_help() {
    eprintln!("femto {} - A minimal full-screen terminal editor", VERSION);
    eprintln!();
    eprintln!("Usage: femto [OPTIONS] [PATH]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [PATH]                Document to load (first line only)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keybindings:");
    eprintln!("  Arrow keys            Move the cursor");
    eprintln!("  PgUp / PgDn           Move a full screen height");
    eprintln!("  Home / End            Jump to the first / last column");
    eprintln!("  Ctrl+Q                Quit");
    eprintln!();
    eprintln!("Exit codes: 0 on quit, 1 on a fatal terminal or file error.");
    eprintln!();
    eprintln!("Log file: ~/.femto/femto.log");
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args { path: None };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            arg => {
                if parsed.path.is_some() {
                    return Err("Only one document path may be given".to_string());
                }
                parsed.path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Initialize logging to `~/.femto/femto.log`.
///
/// Stdout belongs to the raw-mode screen, so log output goes to a file.
/// Failures here are ignored: the editor works fine without a log.
fn init_logging() {
    let home = env::var_os("HOME").map(PathBuf::from);
    let log_path = home
        .map(|h| h.join(".femto").join("femto.log"))
        .unwrap_or_else(|| PathBuf::from("femto.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("femto {} starting...", VERSION);

    if let Err(err) = run(args) {
        // By this point the tty session has already cleared the screen and
        // restored the original attributes on its way out of `run`.
        error!("fatal: {}", err);
        eprintln!("femto: {}", err);
        std::process::exit(1);
    }

    info!("femto exiting normally");
    Ok(())
}

/// Acquire the raw-mode session, probe the window, load the document and
/// hand control to the editor loop.
///
/// The `Tty` guard clears the screen and restores the original terminal
/// attributes on every path out of this function, quit and fatal error
/// alike.
fn run(args: Args) -> Result<()> {
    let mut tty = Tty::open()?;
    tty.enter_raw_mode()?;

    let geometry = geometry::probe(&mut tty)?;
    info!("Terminal size: {}x{}", geometry.cols, geometry.rows);

    let document = match &args.path {
        Some(path) => {
            info!("Loading {}", path.display());
            Document::load(path)?
        }
        None => Document::empty(),
    };

    let mut editor = Editor::new(geometry, document);
    editor.run(&mut tty, &mut io::stdout())
}
