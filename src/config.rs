//! Configuration management for setlist2playlist.
//!
//! Configuration values come from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Values are read once into a [`Config`] that is handed down explicitly through
//! the run context instead of being looked up from the environment at each call
//! site.

use std::{env, fmt, path::PathBuf, time::Duration};

pub const APP_DIR: &str = "setlist2playlist";

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_SCOPE: &str = "user-read-email playlist-modify-public playlist-modify-private";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SETLISTFM_URL: &str = "https://api.setlist.fm/rest";
const DEFAULT_SETLISTFM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::Invalid { name, value } => {
                write!(f, "{} has an invalid value: {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for talking to Spotify's accounts service and Web API.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Settings for the setlist.fm REST API.
#[derive(Debug, Clone)]
pub struct SetlistFmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub setlistfm: SetlistFmConfig,
    /// Address the OAuth callback listener binds to.
    pub server_address: String,
    /// Upper bound on how long the browser login may take.
    pub auth_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Builds the configuration from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_API_AUTH_CLIENT_ID` is not
    /// set and [`ConfigError::Invalid`] for timeouts that are not whole seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let spotify = SpotifyConfig {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
        };

        let setlistfm = SetlistFmConfig {
            api_key: optional("SETLISTFM_API_KEY"),
            api_url: or_default("SETLISTFM_API_URL", DEFAULT_SETLISTFM_URL),
            timeout: seconds("SETLISTFM_API_TIMEOUT", DEFAULT_SETLISTFM_TIMEOUT_SECS)?,
        };

        Ok(Self {
            spotify,
            setlistfm,
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            auth_timeout: seconds("AUTH_TIMEOUT", DEFAULT_AUTH_TIMEOUT_SECS)?,
            log_level: or_default("LOG_LEVEL", "info").to_lowercase(),
        })
    }

    pub fn debug_enabled(&self) -> bool {
        self.log_level == "debug"
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/setlist2playlist/.env`
/// - macOS: `~/Library/Application Support/setlist2playlist/.env`
/// - Windows: `%LOCALAPPDATA%/setlist2playlist/.env`
///
/// A missing file is not an error: the process environment alone may carry the
/// configuration. Variables already present in the environment win.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Returns the directory holding the `.env` file and cached session.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn env_path() -> PathBuf {
    data_dir().join(".env")
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn or_default(name: &'static str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

fn seconds(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(Duration::from_secs(default)),
    }
}
