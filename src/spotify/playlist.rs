use std::{fmt, sync::Arc};

use crate::{
    debug,
    spotify::Catalog,
    types::{CreatedPlaylist, PlaylistVisibility, Song},
};

pub const DEFAULT_DESCRIPTION: &str = "Generated by setlist2playlist from a setlist.fm setlist";

#[derive(Debug)]
pub enum PlaylistError {
    /// None of the titles resolved to a track; no playlist was created.
    NothingToAdd,
    User(String),
    Create(String),
    /// The playlist exists but is empty. It is not removed.
    AddTracks {
        playlist: CreatedPlaylist,
        reason: String,
    },
}

impl fmt::Display for PlaylistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistError::NothingToAdd => write!(f, "none of the songs were found on Spotify"),
            PlaylistError::User(e) => write!(f, "failed to load current Spotify user: {}", e),
            PlaylistError::Create(e) => write!(f, "failed to create playlist: {}", e),
            PlaylistError::AddTracks { playlist, reason } => write!(
                f,
                "failed to add tracks to playlist {} (left empty): {}",
                playlist.url, reason
            ),
        }
    }
}

impl std::error::Error for PlaylistError {}

/// The description to send, falling back to [`DEFAULT_DESCRIPTION`] when none
/// or an empty one is given.
pub fn description_or_default(description: Option<&str>) -> String {
    match description.map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => DEFAULT_DESCRIPTION.to_string(),
    }
}

/// Creates a playlist for the signed-in user and fills it, one step after the
/// other.
pub struct PlaylistAssembler<C: ?Sized> {
    catalog: Arc<C>,
    visibility: PlaylistVisibility,
}

impl<C> PlaylistAssembler<C>
where
    C: Catalog + ?Sized,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            visibility: PlaylistVisibility::default(),
        }
    }

    pub fn with_visibility(mut self, visibility: PlaylistVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub async fn create_playlist(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<CreatedPlaylist, PlaylistError> {
        let user = self
            .catalog
            .current_user()
            .await
            .map_err(|e| PlaylistError::User(e.to_string()))?;

        let description = description_or_default(description);
        debug!("Creating playlist \"{}\" for user {}", title, user.id);

        let playlist = self
            .catalog
            .create_playlist(&user.id, title, &description, self.visibility)
            .await
            .map_err(|e| PlaylistError::Create(e.to_string()))?;

        debug!("Playlist created: {} ({})", playlist.id, playlist.url);
        Ok(playlist)
    }

    pub async fn add_tracks(
        &self,
        playlist: &CreatedPlaylist,
        songs: &[Song],
    ) -> Result<(), PlaylistError> {
        let track_ids: Vec<String> = songs.iter().map(|s| s.id.clone()).collect();
        debug!("Adding {} tracks to playlist {}", track_ids.len(), playlist.id);

        self.catalog
            .add_tracks(&playlist.id, &track_ids)
            .await
            .map_err(|e| PlaylistError::AddTracks {
                playlist: playlist.clone(),
                reason: e.to_string(),
            })
    }

    /// Creates the playlist and adds every resolved song in order.
    ///
    /// Empty slots are skipped. If no slot holds a song, nothing is created.
    pub async fn assemble(
        &self,
        title: &str,
        description: Option<&str>,
        resolved: &[Option<Song>],
    ) -> Result<CreatedPlaylist, PlaylistError> {
        let songs: Vec<Song> = resolved.iter().flatten().cloned().collect();
        if songs.is_empty() {
            return Err(PlaylistError::NothingToAdd);
        }

        let playlist = self.create_playlist(title, description).await?;
        self.add_tracks(&playlist, &songs).await?;
        Ok(playlist)
    }
}
