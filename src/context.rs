use std::sync::Arc;

use crate::{
    config::Config,
    management::{SessionManager, SessionStore},
    server::HttpCallbackListener,
    setlistfm::{SetlistError, SetlistFmClient},
    spotify::{Authenticator, SpotifyAuth, SpotifyClient},
};

/// Collaborators for one run, built once in `main` and passed to the commands.
pub struct AppContext {
    pub config: Config,
    pub spotify: Arc<SpotifyClient>,
    pub store: Arc<dyn SessionStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let spotify = Arc::new(SpotifyClient::new(config.spotify.clone()));
        Self {
            config,
            spotify,
            store: Arc::new(SessionManager::new()),
        }
    }

    pub fn authenticator(&self) -> Authenticator {
        let auth: Arc<dyn SpotifyAuth> = self.spotify.clone();
        let listener = HttpCallbackListener::new(&self.config.server_address, Arc::clone(&auth));

        Authenticator::new(auth, Arc::clone(&self.store), Arc::new(listener))
            .with_login_timeout(self.config.auth_timeout)
    }

    pub fn setlistfm(&self) -> Result<SetlistFmClient, SetlistError> {
        SetlistFmClient::new(&self.config.setlistfm)
    }
}
