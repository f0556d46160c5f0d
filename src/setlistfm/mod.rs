//! # setlist.fm Module
//!
//! Reads the songs of a concert from setlist.fm: [`extract_setlist_id`] turns
//! a public setlist URL into its id and [`SetlistFmClient`] fetches the setlist
//! from the REST API.

mod client;
mod url;

pub use client::SetlistFmClient;
pub use client::SetlistError;
pub use url::extract_setlist_id;
