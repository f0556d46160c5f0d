use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::{auth::authenticate, setlist},
    context::AppContext,
    error, info,
    spotify::{
        playlist::{PlaylistAssembler, PlaylistError},
        tracks::{TrackResolver, unresolved},
    },
    success,
    types::PlaylistVisibility,
    warning,
};

pub struct PlaylistOptions {
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub private: bool,
    pub strict: bool,
}

pub async fn playlist(ctx: &AppContext, opts: PlaylistOptions) {
    let set = match setlist::load_setlist(ctx, &opts.url).await {
        Ok(set) => set,
        Err(e) => error!("Failed to load setlist: {}", e),
    };

    let titles = set.songs();
    if titles.is_empty() {
        error!("Setlist {} has no songs", set.title());
    }

    let client = Arc::new(authenticate(ctx).await);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!(
        "Searching {} songs by {} on Spotify...",
        titles.len(),
        set.artist_name()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let resolved = TrackResolver::new(Arc::clone(&client))
        .with_title_match(opts.strict)
        .resolve(&titles, set.artist_name())
        .await;
    pb.finish_and_clear();

    println!("{}", Table::new(setlist::resolution_rows(&titles, &resolved)));

    let missing = unresolved(&titles, &resolved);
    if !missing.is_empty() {
        warning!(
            "{} of {} songs were not found and will be skipped: {}",
            missing.len(),
            titles.len(),
            missing.join(", ")
        );
    }

    let name = opts.name.unwrap_or_else(|| set.title());
    info!("Creating playlist \"{}\"", name);

    let assembler = PlaylistAssembler::new(client).with_visibility(PlaylistVisibility {
        public: !opts.private,
        collaborative: false,
    });

    match assembler
        .assemble(&name, opts.description.as_deref(), &resolved)
        .await
    {
        Ok(created) => success!("Playlist created: {}", created.url),
        Err(PlaylistError::NothingToAdd) => {
            error!("None of the songs were found on Spotify, no playlist created")
        }
        Err(e) => error!("{}", e),
    }
}
