use std::{collections::HashMap, fmt, sync::Arc};

use axum::{Extension, extract::Query, response::Html};

use crate::{
    debug,
    spotify::{LoginAttempt, SpotifyAuth},
    warning,
};

const SUCCESS_PAGE: &str = "<h2>Authentication successful.</h2><p>You can close this browser window and return to your terminal.</p>";
const FAILURE_PAGE: &str = "<h4>Login failed.</h4><p>Check your terminal for details.</p>";
const COMPLETED_PAGE: &str = "<h4>Login already completed.</h4>";

/// Shared with the callback handler for the duration of one login attempt.
#[derive(Clone)]
pub struct CallbackState {
    pub attempt: Arc<LoginAttempt>,
    pub auth: Arc<dyn SpotifyAuth>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    AlreadyCompleted,
    Denied(String),
    StateMismatch,
    MissingCode,
    Exchange(String),
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackError::AlreadyCompleted => write!(f, "login already completed"),
            CallbackError::Denied(reason) => write!(f, "authorization denied: {}", reason),
            CallbackError::StateMismatch => write!(f, "state mismatch in callback"),
            CallbackError::MissingCode => write!(f, "callback carried no authorization code"),
            CallbackError::Exchange(e) => write!(f, "token exchange failed: {}", e),
        }
    }
}

impl std::error::Error for CallbackError {}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    match complete_login(&state, &params).await {
        Ok(()) => Html(SUCCESS_PAGE),
        Err(CallbackError::AlreadyCompleted) => Html(COMPLETED_PAGE),
        Err(e) => {
            warning!("Spotify login failed: {}", e);
            Html(FAILURE_PAGE)
        }
    }
}

/// Finishes the login for one provider redirect.
///
/// The attempt's rendezvous is claimed before the code is exchanged, so only
/// the first redirect ever reaches the token endpoint. On success the
/// authenticated client is delivered; any failure is delivered as well, so the
/// waiting command stops instead of hanging.
pub async fn complete_login(
    state: &CallbackState,
    params: &HashMap<String, String>,
) -> Result<(), CallbackError> {
    let delivery = state
        .attempt
        .rendezvous
        .claim()
        .await
        .map_err(|_| CallbackError::AlreadyCompleted)?;

    let outcome = match exchange(state, params).await {
        Ok(client) => delivery.deliver(client),
        Err(e) => {
            if let Err(closed) = delivery.abort(e.to_string()) {
                debug!("Nobody is waiting for the login result: {}", closed);
            }
            return Err(e);
        }
    };

    if let Err(closed) = outcome {
        debug!("Nobody is waiting for the login result: {}", closed);
    }
    Ok(())
}

async fn exchange(
    state: &CallbackState,
    params: &HashMap<String, String>,
) -> Result<crate::spotify::AuthenticatedClient, CallbackError> {
    if let Some(reason) = params.get("error") {
        return Err(CallbackError::Denied(reason.clone()));
    }

    if params.get("state").map(String::as_str) != Some(state.attempt.state.as_str()) {
        return Err(CallbackError::StateMismatch);
    }

    let code = params.get("code").ok_or(CallbackError::MissingCode)?;

    let credential = state
        .auth
        .exchange_code(code, &state.attempt.pkce)
        .await
        .map_err(|e| CallbackError::Exchange(e.to_string()))?;

    Ok(state.auth.client_for(credential))
}
