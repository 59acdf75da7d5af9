//! debug-toggle: comment and uncomment tagged DEBUG blocks in source files.
//!
//! A block is the span between a `DEBUG START [tag]` marker comment and the next
//! `DEBUG END` marker comment. Its state is derived from the text every time:
//! a body whose non-blank lines are all commented out is inactive, anything
//! else is active. The library exposes the scanner and engine as pure
//! functions, a file applier and batch driver on top of them, and the
//! interactive watch session used by the CLI.

pub mod applier;
pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod parser;
pub mod report;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use applier::{apply_to_file, FileOutcome, FileStatus};
pub use batch::{run_batch, BatchReport};
pub use cli::{Cli, Commands};
pub use engine::{apply, Rewrite};
pub use error::ToggleError;
pub use parser::{scan, CommentStyle, ScanError, StyleRegistry};
pub use session::{SessionEvent, SessionState, WatchSession};
pub use types::{BlockState, Mode, Region, Tag, TagFilter, TaggedBlock, ToggleRequest};

/// Install the stderr log subscriber: DEBUG when verbose, WARN otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
