use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    Res,
    config::SpotifyConfig,
    debug,
    spotify::{
        Catalog, SpotifyAuth,
        pkce::{CHALLENGE_METHOD, PkceCodes},
        session::{Credential, Session},
    },
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatedPlaylist, CurrentUser, PlaylistResponse,
        PlaylistVisibility, SearchResponse, Song, TokenResponse,
    },
};

/// Spotify accepts at most this many tracks per add-items request.
const ADD_TRACKS_CHUNK: usize = 100;

/// Client for Spotify's accounts service.
///
/// Builds authorization URLs, runs the PKCE code exchange and token refresh, and
/// hands out [`AuthenticatedClient`]s bound to a credential.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, reqwest::Error> {
        self.http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await
    }
}

#[async_trait]
impl SpotifyAuth for SpotifyClient {
    fn authorize_url(&self, state: &str, pkce: &PkceCodes) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_challenge_method", CHALLENGE_METHOD),
            ("code_challenge", pkce.challenge()),
            ("scope", self.config.scope.as_str()),
            ("state", state),
        ];

        match Url::parse_with_params(&self.config.auth_url, &params) {
            Ok(url) => url.to_string(),
            // An unparsable base is left for the browser to reject.
            Err(_) => format!(
                "{}?{}",
                self.config.auth_url,
                params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("&")
            ),
        }
    }

    async fn exchange_code(&self, code: &str, pkce: &PkceCodes) -> Res<Credential> {
        debug!("Exchanging authorization code for a session");
        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("code", code),
                ("code_verifier", pkce.verifier()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        Ok(Credential::from_token_response(token, None, Utc::now())?)
    }

    async fn refresh(&self, credential: &Credential) -> Res<Credential> {
        debug!("Refreshing Spotify session");
        let token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credential.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .await?;

        Ok(Credential::from_token_response(
            token,
            Some(&credential.refresh_token),
            Utc::now(),
        )?)
    }

    fn client_for(&self, credential: Credential) -> AuthenticatedClient {
        AuthenticatedClient {
            http: self.http.clone(),
            api_url: self.config.api_url.trim_end_matches('/').to_string(),
            credential,
        }
    }
}

/// Handle to the Spotify Web API bound to one session.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    http: Client,
    api_url: String,
    credential: Credential,
}

impl AuthenticatedClient {
    pub fn new(api_url: &str, credential: Credential) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    /// The session this client is bound to, in its persisted form.
    pub fn session(&self) -> Session {
        Session::from_credential(&self.credential)
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl Catalog for AuthenticatedClient {
    async fn search_track(&self, query: &str) -> Res<Option<Song>> {
        let response = self
            .http
            .get(self.url("/search"))
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(response
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(Song::from))
    }

    async fn current_user(&self) -> Res<CurrentUser> {
        let user = self
            .http
            .get(self.url("/me"))
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<CurrentUser>()
            .await?;
        Ok(user)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
        visibility: PlaylistVisibility,
    ) -> Res<CreatedPlaylist> {
        let body = CreatePlaylistRequest {
            name: title.to_string(),
            description: description.to_string(),
            public: visibility.public,
            collaborative: visibility.collaborative,
        };

        let playlist = self
            .http
            .post(self.url(&format!("/users/{}/playlists", user_id)))
            .bearer_auth(&self.credential.access_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<PlaylistResponse>()
            .await?;

        let url = playlist
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", playlist.id));

        Ok(CreatedPlaylist {
            id: playlist.id,
            url,
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        for chunk in track_ids.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTracksRequest {
                uris: chunk
                    .iter()
                    .map(|id| format!("spotify:track:{}", id))
                    .collect(),
            };

            self.http
                .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .bearer_auth(&self.credential.access_token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }
}
