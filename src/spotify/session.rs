use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TokenResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    MissingField(&'static str),
    Expired,
    MalformedExpiry(String),
    /// Token lifetime from the token endpoint that is negative or too large.
    InvalidLifetime(i64),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingField(field) => {
                write!(f, "no {} found in session data", field)
            }
            SessionError::Expired => write!(f, "session has expired"),
            SessionError::MalformedExpiry(value) => {
                write!(f, "session expiry is not an RFC3339 timestamp: {}", value)
            }
            SessionError::InvalidLifetime(seconds) => {
                write!(f, "token lifetime of {}s is out of range", seconds)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Persisted OAuth credential for the signed-in Spotify user.
///
/// Serialized as flat JSON with the four fields below. A session is never
/// changed in place: a refresh produces a new one that replaces it in storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// RFC3339 timestamp after which the access token is no longer accepted.
    pub expiry: String,
    pub token_type: String,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expiry: expiry.into(),
            token_type: token_type.into(),
        }
    }

    pub fn from_credential(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token.clone(),
            refresh_token: credential.refresh_token.clone(),
            expiry: credential
                .expires_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            token_type: credential.token_type.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.validate_at(Utc::now())
    }

    /// Checks the session against `now`: every field must be present and the
    /// expiry must lie strictly after `now`.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let fields = [
            ("access token", &self.access_token),
            ("refresh token", &self.refresh_token),
            ("expiry", &self.expiry),
            ("token type", &self.token_type),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SessionError::MissingField(*name));
        }

        if parse_expiry(&self.expiry)? <= now {
            return Err(SessionError::Expired);
        }

        Ok(())
    }

    /// Converts the stored textual expiry into the temporal form used for
    /// token exchanges.
    pub fn to_credential(&self) -> Result<Credential, SessionError> {
        Ok(Credential {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: parse_expiry(&self.expiry)?,
            token_type: self.token_type.clone(),
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expiry", &self.expiry)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Session data with a parsed expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl Credential {
    /// Builds a credential from a token endpoint response received at `now`.
    ///
    /// Refresh responses may omit the refresh token; `previous_refresh` is kept
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidLifetime`] when `expires_in` is negative or
    /// does not fit a timestamp.
    pub fn from_token_response(
        response: TokenResponse,
        previous_refresh: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let lifetime = response.expires_in;
        let expires_at = Some(lifetime)
            .filter(|seconds| *seconds >= 0)
            .and_then(Duration::try_seconds)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or(SessionError::InvalidLifetime(lifetime))?;

        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        Ok(Self {
            access_token: response.access_token,
            refresh_token,
            expires_at,
            token_type: response.token_type,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn parse_expiry(value: &str) -> Result<DateTime<Utc>, SessionError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| SessionError::MalformedExpiry(value.to_string()))
}

fn redact(token: &str) -> String {
    if token.chars().count() <= 8 {
        return "*".repeat(token.chars().count());
    }
    format!("{}…", token.chars().take(4).collect::<String>())
}
