//! Setlist to Playlist Library
//!
//! This library turns a concert setlist published on setlist.fm into a Spotify
//! playlist. It contains the Spotify session handling (PKCE authorization, token
//! refresh and persistence), the concurrent track resolver, playlist assembly and
//! the setlist.fm client used to read the songs that were played.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `cli` - Command implementations
//! - `config` - Environment loading and typed configuration
//! - `context` - Run-scoped context passed to every command
//! - `management` - Session persistence
//! - `server` - Local HTTP server for OAuth callbacks
//! - `setlistfm` - setlist.fm URL parsing and API client
//! - `spotify` - Spotify authorization, search and playlist operations
//! - `types` - Wire formats exchanged with the remote APIs

use std::sync::atomic::{AtomicBool, Ordering};

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod management;
pub mod server;
pub mod setlistfm;
pub mod spotify;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error that is `Send + Sync`, so it can cross task
/// boundaries in async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

static DEBUG_OUTPUT: AtomicBool = AtomicBool::new(false);

/// Turns on output of the [`debug!`] macro for the rest of the process.
pub fn enable_debug_output() {
    DEBUG_OUTPUT.store(true, Ordering::Relaxed);
}

/// Returns whether [`debug!`] output is currently printed.
pub fn debug_output_enabled() -> bool {
    DEBUG_OUTPUT.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading setlist {}", setlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the process with exit code 1. It is reserved for the
/// command layer; library operations return errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, e.g. a single failed song search or a browser
/// that could not be opened.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic message when debug output is enabled.
///
/// Debug output is off by default and turned on with `--verbose` or
/// `LOG_LEVEL=debug`.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::debug_output_enabled() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*).to_string().dimmed());
    }
  })
}
