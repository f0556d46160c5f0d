use axum::{Extension, response::Json};
use serde_json::{Value, json};

use super::CallbackState;

/// Liveness of the callback listener and whether the login is still pending.
pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    let login = if state.attempt.rendezvous.is_open().await {
        "pending"
    } else {
        "completed"
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "login": login,
    }))
}
