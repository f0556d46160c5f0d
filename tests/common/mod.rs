#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};

use setlist2playlist::{
    Res,
    api::{CallbackState, complete_login},
    management::{SessionStore, StoreError},
    spotify::{
        AuthenticatedClient, CallbackListener, Catalog, Credential, LoginAttempt, PkceCodes,
        Session, SpotifyAuth, auth::ListenerHandle, tracks::search_query,
    },
    types::{CreatedPlaylist, CurrentUser, PlaylistVisibility, Song},
};

pub fn song(id: &str, title: &str, album: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        album: album.to_string(),
    }
}

pub fn titles(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn rfc3339_in(seconds: i64) -> String {
    (Utc::now() + ChronoDuration::seconds(seconds)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn valid_session() -> Session {
    Session::new("stored-access", "stored-refresh", rfc3339_in(3600), "Bearer")
}

pub fn expired_session() -> Session {
    Session::new("stored-access", "stored-refresh", rfc3339_in(-60), "Bearer")
}

// ---------------------------------------------------------------------------
// Catalog

#[derive(Default)]
pub struct FakeCatalog {
    artist: String,
    matches: HashMap<String, Song>,
    failing: HashSet<String>,
    delays: HashMap<String, u64>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    searches: AtomicUsize,
    pub fail_create: bool,
    pub fail_add: bool,
    pub created: Mutex<Vec<(String, String, String, PlaylistVisibility)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeCatalog {
    pub fn new(artist: &str) -> Self {
        Self {
            artist: artist.to_string(),
            ..Default::default()
        }
    }

    pub fn with_match(mut self, title: &str, found: Song) -> Self {
        self.matches.insert(search_query(title, &self.artist), found);
        self
    }

    pub fn with_failure(mut self, title: &str) -> Self {
        self.failing.insert(search_query(title, &self.artist));
        self
    }

    pub fn with_delay(mut self, title: &str, millis: u64) -> Self {
        self.delays.insert(search_query(title, &self.artist), millis);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search_track(&self, query: &str) -> Res<Option<Song>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(query).copied().unwrap_or(10);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(query) {
            return Err(format!("search failed for {}", query).into());
        }
        Ok(self.matches.get(query).cloned())
    }

    async fn current_user(&self) -> Res<CurrentUser> {
        Ok(CurrentUser {
            id: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
            email: None,
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
        visibility: PlaylistVisibility,
    ) -> Res<CreatedPlaylist> {
        if self.fail_create {
            return Err("playlist creation rejected".into());
        }
        self.created.lock().unwrap().push((
            user_id.to_string(),
            title.to_string(),
            description.to_string(),
            visibility,
        ));
        Ok(CreatedPlaylist {
            id: "p1".to_string(),
            url: "https://open.spotify.com/playlist/p1".to_string(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        if self.fail_add {
            return Err("adding tracks rejected".into());
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), track_ids.to_vec()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session store

#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
    pub fail_write: bool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            ..Default::default()
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub fn current(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn read(&self) -> Result<Session, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.session.lock().unwrap().clone().ok_or(StoreError::NotFound)
    }

    async fn write(&self, session: &Session) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_write {
            return Err(StoreError::IoError(std::io::Error::other("disk full")));
        }
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Accounts service

pub const GOOD_CODE: &str = "good-code";

#[derive(Default)]
pub struct FakeAuth {
    pub fail_refresh: bool,
    pub exchange_delay: Option<Duration>,
    refreshes: AtomicUsize,
    exchanges: AtomicUsize,
    pub verifiers: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn rejecting_refresh() -> Self {
        Self {
            fail_refresh: true,
            ..Default::default()
        }
    }

    pub fn slow_exchange(delay: Duration) -> Self {
        Self {
            exchange_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

fn credential(access: &str, refresh: &str) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at: Utc::now() + ChronoDuration::seconds(3600),
        token_type: "Bearer".to_string(),
    }
}

#[async_trait]
impl SpotifyAuth for FakeAuth {
    fn authorize_url(&self, state: &str, pkce: &PkceCodes) -> String {
        format!(
            "https://accounts.example/authorize?state={}&code_challenge={}&code_challenge_method=S256",
            state,
            pkce.challenge()
        )
    }

    async fn exchange_code(&self, code: &str, pkce: &PkceCodes) -> Res<Credential> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.exchange_delay {
            tokio::time::sleep(delay).await;
        }
        self.verifiers
            .lock()
            .unwrap()
            .push(pkce.verifier().to_string());
        if code != GOOD_CODE {
            return Err("invalid_grant".into());
        }
        Ok(credential("login-access", "login-refresh"))
    }

    async fn refresh(&self, current: &Credential) -> Res<Credential> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh {
            return Err("refresh token revoked".into());
        }
        Ok(credential("refreshed-access", &current.refresh_token))
    }

    fn client_for(&self, credential: Credential) -> AuthenticatedClient {
        AuthenticatedClient::new("http://127.0.0.1:9/v1", credential)
    }
}

// ---------------------------------------------------------------------------
// Callback listener

#[derive(Clone)]
pub enum Redirect {
    /// Redirect with the attempt's state and the given code.
    Code(String),
    /// Redirect carrying a foreign state value.
    WrongState,
    /// Never redirects.
    Never,
}

pub struct FakeListener {
    auth: Arc<dyn SpotifyAuth>,
    redirect: Redirect,
    pub fail_start: bool,
    starts: AtomicUsize,
}

impl FakeListener {
    pub fn new(auth: Arc<dyn SpotifyAuth>, redirect: Redirect) -> Self {
        Self {
            auth,
            redirect,
            fail_start: false,
            starts: AtomicUsize::new(0),
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallbackListener for FakeListener {
    async fn start(&self, attempt: Arc<LoginAttempt>) -> Res<ListenerHandle> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err("address already in use".into());
        }

        let mut params = HashMap::new();
        match &self.redirect {
            Redirect::Code(code) => {
                params.insert("state".to_string(), attempt.state.clone());
                params.insert("code".to_string(), code.clone());
            }
            Redirect::WrongState => {
                params.insert("state".to_string(), "forged-state".to_string());
                params.insert("code".to_string(), GOOD_CODE.to_string());
            }
            Redirect::Never => return Ok(ListenerHandle::detached()),
        }

        let state = CallbackState {
            attempt,
            auth: Arc::clone(&self.auth),
        };
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = complete_login(&state, &params).await;
        });
        Ok(ListenerHandle::new(task))
    }
}

pub fn no_browser(_url: &str) -> std::io::Result<()> {
    Err(std::io::Error::other("no browser available"))
}
