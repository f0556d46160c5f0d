use crate::{
    context::AppContext,
    error, info,
    spotify::{AuthenticatedClient, Catalog, LoginPath},
    success,
};

pub async fn auth(ctx: &AppContext) {
    let client = authenticate(ctx).await;

    match client.current_user().await {
        Ok(user) => {
            let name = user.display_name.or(user.email).unwrap_or(user.id);
            success!("Signed in to Spotify as \"{}\"", name);
        }
        Err(e) => error!("Failed to load current Spotify user: {}", e),
    }
}

/// Runs the session flow for a command, exiting the process on failure.
pub(crate) async fn authenticate(ctx: &AppContext) -> AuthenticatedClient {
    info!("Checking Spotify session");
    match ctx.authenticator().authenticate().await {
        Ok(authenticated) => {
            match authenticated.path {
                LoginPath::Refreshed => success!("Spotify session refreshed"),
                LoginPath::BrowserLogin => success!("Spotify session created"),
            }
            authenticated.client
        }
        Err(e) => error!("Spotify authentication failed: {}", e),
    }
}
