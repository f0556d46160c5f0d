//! # API Module
//!
//! HTTP handlers served by the short-lived local listener during a browser login.
//!
//! ## Endpoints
//!
//! - [`callback`] - receives Spotify's redirect, checks `state`, exchanges the
//!   authorization code together with the PKCE verifier and hands the resulting
//!   client to the waiting command.
//! - [`health`] - reports that the listener is up, with the crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use setlist2playlist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback).layer(Extension(state)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::CallbackError;
pub use callback::CallbackState;
pub use callback::callback;
pub use callback::complete_login;
pub use health::health;
