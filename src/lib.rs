//! tune2tube library
//!
//! Moves a Spotify playlist to YouTube: every track is matched to a video,
//! the YouTube playlist is reconciled against the matches, and a resume
//! ledger keeps track of unfinished work when the YouTube quota runs out.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `http` - Shared request retry handling
//! - `management` - Token, match cache, resume ledger and sync list stores
//! - `oauth` - OAuth 2.0 PKCE flow for Spotify and Google
//! - `platform` - Collaborator traits and the classified `PlatformError`
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify source client
//! - `sync` - Resolver, differ, executor and the sync engine
//! - `types` - Data structures and API payloads
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube destination client
//!
//! The binary in `main.rs` only parses arguments and dispatches to
//! [`cli`]. Everything below it is usable as a library, with the remote
//! services behind the traits in [`platform`].

pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod management;
pub mod oauth;
pub mod platform;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;
pub mod youtube;

/// Boxed error result used by the CLI plumbing, where errors of several
/// kinds are only ever reported, never matched on.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```ignore
/// info!("Found {} tracks in \"{}\"", count, name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only the CLI layer uses this. Library code returns errors instead, so a
/// halted sync always gets to save its resume ledger first.
///
/// ```ignore
/// let delay = match config::request_delay() {
///     Ok(delay) => delay,
///     Err(e) => error!("{}", e), // evaluates to `!`
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr. Stderr keeps `--only-link` output
/// clean for scripts.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
