//! # CLI Module
//!
//! Command implementations for setlist2playlist. Each command receives the
//! run's [`crate::context::AppContext`], talks to the library layers and reports
//! progress with the crate's output macros. Commands end the process with a
//! single error message when something fatal happens.
//!
//! ## Commands
//!
//! - [`auth`] - signs in to Spotify (or refreshes the stored session) and saves
//!   the session
//! - [`setlist`] - prints the songs of a setlist.fm setlist
//! - [`playlist`] - resolves a setlist's songs on Spotify and creates a
//!   playlist from them
//!
//! ## Flow of `playlist`
//!
//! ```text
//! setlist.fm URL → setlist id → songs
//!      ↓
//! Spotify session (refresh or browser login)
//!      ↓
//! track search (5 at a time) → playlist → tracks
//! ```
//!
//! ## Usage
//!
//! ```bash
//! setlist2playlist auth
//! setlist2playlist setlist --url https://www.setlist.fm/setlist/...-53aa1325.html
//! setlist2playlist playlist --url https://www.setlist.fm/setlist/...-53aa1325.html
//! ```

mod auth;
mod playlist;
mod setlist;

pub use auth::auth;
pub use playlist::PlaylistOptions;
pub use playlist::playlist;
pub use setlist::setlist;
