//! # Spotify Integration Module
//!
//! Everything that talks to Spotify: the OAuth 2.0 Authorization Code flow with
//! PKCE, session persistence and refresh, catalog search and playlist creation.
//!
//! ## Architecture
//!
//! ```text
//! CLI commands
//!      ↓
//! Authenticator ──(Rendezvous)── callback listener (crate::server)
//!      ↓
//! AuthenticatedClient ──→ TrackResolver ──→ PlaylistAssembler
//!      ↓
//! Spotify Web API (reqwest, JSON)
//! ```
//!
//! ## Modules
//!
//! - [`pkce`] - verifier/challenge pairs and the `state` value
//! - [`session`] - the persisted credential and its validity rules
//! - [`rendezvous`] - single-use hand-off between the callback listener and the
//!   waiting command
//! - [`auth`] - the [`auth::Authenticator`] deciding between refresh and browser
//!   login
//! - [`client`] - HTTP clients for the accounts service and the Web API
//! - [`tracks`] - bounded-concurrency resolution of setlist titles
//! - [`playlist`] - playlist creation and track adding
//!
//! ## Seams
//!
//! [`SpotifyAuth`] and [`Catalog`] are the two traits the core depends on.
//! [`client::SpotifyClient`] and [`client::AuthenticatedClient`] implement them
//! over HTTP; tests substitute in-memory versions.

use async_trait::async_trait;

use crate::{
    Res,
    types::{CreatedPlaylist, CurrentUser, PlaylistVisibility, Song},
};

pub mod auth;
pub mod client;
pub mod pkce;
pub mod playlist;
pub mod rendezvous;
pub mod session;
pub mod tracks;

pub use auth::{Authenticated, Authenticator, CallbackListener, LoginAttempt, LoginPath};
pub use client::{AuthenticatedClient, SpotifyClient};
pub use pkce::PkceCodes;
pub use session::{Credential, Session, SessionError};

/// Token operations against Spotify's accounts service.
#[async_trait]
pub trait SpotifyAuth: Send + Sync {
    /// Authorization URL carrying `state`, the PKCE challenge and `S256`.
    fn authorize_url(&self, state: &str, pkce: &PkceCodes) -> String;

    /// Exchanges an authorization code, proving possession of the verifier.
    async fn exchange_code(&self, code: &str, pkce: &PkceCodes) -> Res<Credential>;

    async fn refresh(&self, credential: &Credential) -> Res<Credential>;

    fn client_for(&self, credential: Credential) -> AuthenticatedClient;
}

/// Catalog and playlist operations on behalf of the signed-in user.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Best match for `query`, if any.
    async fn search_track(&self, query: &str) -> Res<Option<Song>>;

    async fn current_user(&self) -> Res<CurrentUser>;

    async fn create_playlist(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
        visibility: PlaylistVisibility,
    ) -> Res<CreatedPlaylist>;

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()>;
}
