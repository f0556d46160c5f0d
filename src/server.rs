use std::{net::SocketAddr, str::FromStr, sync::Arc};

use async_trait::async_trait;
use axum::{Extension, Router, routing::get};

use crate::{
    Res, api, debug,
    spotify::{
        CallbackListener, LoginAttempt, SpotifyAuth,
        auth::ListenerHandle,
    },
    warning,
};

pub fn router(state: api::CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Binds the callback listener and serves it on a background task.
///
/// Binding happens before this returns, so the redirect cannot arrive before
/// the listener is ready. The returned handle stops the server when dropped.
pub async fn start_api_server(address: &str, state: api::CallbackState) -> Res<ListenerHandle> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| format!("Failed to parse server address {}: {}", address, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    debug!("Callback listener bound to {}", addr);

    let app = router(state);
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback listener stopped: {}", e);
        }
    });

    Ok(ListenerHandle::new(task))
}

/// [`CallbackListener`] backed by the local axum server.
pub struct HttpCallbackListener {
    address: String,
    auth: Arc<dyn SpotifyAuth>,
}

impl HttpCallbackListener {
    pub fn new(address: impl Into<String>, auth: Arc<dyn SpotifyAuth>) -> Self {
        Self {
            address: address.into(),
            auth,
        }
    }
}

#[async_trait]
impl CallbackListener for HttpCallbackListener {
    async fn start(&self, attempt: Arc<LoginAttempt>) -> Res<ListenerHandle> {
        let state = api::CallbackState {
            attempt,
            auth: Arc::clone(&self.auth),
        };
        start_api_server(&self.address, state).await
    }
}
