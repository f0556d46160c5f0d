use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::{
    Res, debug, info,
    management::SessionStore,
    spotify::{
        SpotifyAuth,
        client::AuthenticatedClient,
        pkce::{self, PkceCodes, PkceError},
        rendezvous::{Rendezvous, RendezvousError},
        session::Session,
    },
    success, warning,
};

/// Opens a URL in the user's browser.
pub type OpenBrowser = fn(&str) -> std::io::Result<()>;

/// Everything bound to one browser authorization attempt.
///
/// The rendezvous is created together with the state and PKCE codes, before
/// the callback listener starts and before the authorization URL is shown.
pub struct LoginAttempt {
    pub state: String,
    pub pkce: PkceCodes,
    pub rendezvous: Rendezvous<AuthenticatedClient>,
}

impl LoginAttempt {
    pub fn new() -> Result<Self, PkceError> {
        Ok(Self::with_codes(pkce::generate_state()?, PkceCodes::generate()?))
    }

    pub fn with_codes(state: impl Into<String>, pkce: PkceCodes) -> Self {
        Self {
            state: state.into(),
            pkce,
            rendezvous: Rendezvous::new(),
        }
    }
}

/// Stops the callback listener when dropped.
pub struct ListenerHandle {
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle for a listener whose lifetime is managed elsewhere.
    pub fn detached() -> Self {
        Self { task: None }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Receives the provider's redirect and delivers an authenticated client.
///
/// Implementations must validate `state`, exchange the code together with the
/// PKCE verifier and deliver exactly one result into the attempt's rendezvous.
#[async_trait]
pub trait CallbackListener: Send + Sync {
    async fn start(&self, attempt: Arc<LoginAttempt>) -> Res<ListenerHandle>;
}

/// Where [`Authenticator::check_persisted`] sends the flow next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextState {
    Refreshing(Session),
    AwaitingBrowserLogin { reason: String },
}

/// How the session of a successful run was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPath {
    Refreshed,
    BrowserLogin,
}

#[derive(Debug)]
pub struct Authenticated {
    pub client: AuthenticatedClient,
    pub path: LoginPath,
}

#[derive(Debug)]
pub enum AuthError {
    Pkce(PkceError),
    Refresh(String),
    Listener(String),
    Login(RendezvousError),
    /// Authentication succeeded but the session could not be saved. The client
    /// is still valid for the current run.
    Persist {
        client: Box<AuthenticatedClient>,
        reason: String,
    },
}

impl AuthError {
    /// The client obtained before the failure, if there is one.
    pub fn into_client(self) -> Option<AuthenticatedClient> {
        match self {
            AuthError::Persist { client, .. } => Some(*client),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Pkce(e) => write!(f, "{}", e),
            AuthError::Refresh(e) => write!(f, "failed to refresh Spotify session: {}", e),
            AuthError::Listener(e) => write!(f, "failed to start callback listener: {}", e),
            AuthError::Login(e) => write!(f, "{}", e),
            AuthError::Persist { reason, .. } => {
                write!(f, "failed to save Spotify session: {}", reason)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<PkceError> for AuthError {
    fn from(err: PkceError) -> Self {
        AuthError::Pkce(err)
    }
}

impl From<RendezvousError> for AuthError {
    fn from(err: RendezvousError) -> Self {
        AuthError::Login(err)
    }
}

/// Produces a usable Spotify session for the run.
///
/// The flow goes `CheckPersisted -> {Refreshing | AwaitingBrowserLogin} ->
/// Authenticated -> Persisted`:
/// - a stored session that validates is always refreshed once, which also
///   catches tokens revoked on Spotify's side;
/// - a missing or invalid session leads to a PKCE browser login;
/// - a failed refresh is returned as an error, without falling back to a
///   browser login.
///
/// The store is read at most once and written at most once per call.
pub struct Authenticator {
    auth: Arc<dyn SpotifyAuth>,
    store: Arc<dyn SessionStore>,
    listener: Arc<dyn CallbackListener>,
    open_browser: OpenBrowser,
    login_timeout: Option<Duration>,
}

impl Authenticator {
    pub fn new(
        auth: Arc<dyn SpotifyAuth>,
        store: Arc<dyn SessionStore>,
        listener: Arc<dyn CallbackListener>,
    ) -> Self {
        Self {
            auth,
            store,
            listener,
            open_browser: open_in_browser,
            login_timeout: None,
        }
    }

    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = Some(timeout);
        self
    }

    pub fn with_browser(mut self, open_browser: OpenBrowser) -> Self {
        self.open_browser = open_browser;
        self
    }

    pub async fn authenticate(&self) -> Result<Authenticated, AuthError> {
        let (client, path) = match self.check_persisted().await {
            NextState::Refreshing(session) => {
                (self.refresh(&session).await?, LoginPath::Refreshed)
            }
            NextState::AwaitingBrowserLogin { reason } => {
                debug!("No usable stored session ({}), starting browser login", reason);
                (self.browser_login().await?, LoginPath::BrowserLogin)
            }
        };

        self.persist(client, path).await
    }

    pub async fn check_persisted(&self) -> NextState {
        let session = match self.store.read().await {
            Ok(session) => session,
            Err(e) => {
                return NextState::AwaitingBrowserLogin {
                    reason: e.to_string(),
                };
            }
        };

        match session.validate() {
            Ok(()) => NextState::Refreshing(session),
            Err(e) => NextState::AwaitingBrowserLogin {
                reason: e.to_string(),
            },
        }
    }

    async fn refresh(&self, session: &Session) -> Result<AuthenticatedClient, AuthError> {
        let credential = session
            .to_credential()
            .map_err(|e| AuthError::Refresh(e.to_string()))?;

        let refreshed = self
            .auth
            .refresh(&credential)
            .await
            .map_err(|e| AuthError::Refresh(e.to_string()))?;

        Ok(self.auth.client_for(refreshed))
    }

    async fn browser_login(&self) -> Result<AuthenticatedClient, AuthError> {
        let attempt = Arc::new(LoginAttempt::new()?);
        let auth_url = self.auth.authorize_url(&attempt.state, &attempt.pkce);

        let _listener = self
            .listener
            .start(Arc::clone(&attempt))
            .await
            .map_err(|e| AuthError::Listener(e.to_string()))?;

        info!(
            "Opening browser for Spotify authentication.\nIf nothing happens, please visit the following URL: {}",
            auth_url
        );
        if let Err(e) = (self.open_browser)(&auth_url) {
            warning!("Failed to open browser ({}), use the link above to proceed", e);
        }

        let client = attempt.rendezvous.receive(self.login_timeout).await?;
        success!("Spotify authorization completed");
        Ok(client)
    }

    async fn persist(
        &self,
        client: AuthenticatedClient,
        path: LoginPath,
    ) -> Result<Authenticated, AuthError> {
        debug!("Persisting Spotify session");
        if let Err(e) = self.store.write(&client.session()).await {
            return Err(AuthError::Persist {
                client: Box::new(client),
                reason: e.to_string(),
            });
        }

        Ok(Authenticated { client, path })
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    webbrowser::open(url)
}
