use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// A catalog track matched to one title of the setlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<TrackItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub album: AlbumRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

impl From<TrackItem> for Song {
    fn from(item: TrackItem) -> Self {
        Song {
            id: item.id,
            title: item.name,
            album: item.album.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub id: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub url: String,
}

/// Visibility flags for a new playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistVisibility {
    pub public: bool,
    pub collaborative: bool,
}

impl Default for PlaylistVisibility {
    fn default() -> Self {
        Self {
            public: true,
            collaborative: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub id: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub artist: SetlistArtist,
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub tour: Option<Tour>,
    #[serde(default)]
    pub sets: Sets,
    #[serde(default)]
    pub url: String,
}

impl Setlist {
    /// Display title, e.g. `"blink-182 World Tour @ Autódromo, São Paulo - Brazil"`.
    pub fn title(&self) -> String {
        let artist = match &self.tour {
            Some(tour) if !tour.name.is_empty() => format!("{} {}", self.artist.name, tour.name),
            _ => self.artist.name.clone(),
        };
        format!(
            "{} @ {}, {} - {}",
            artist, self.venue.name, self.venue.city.name, self.venue.city.country.name
        )
    }

    /// All song titles in the order they were played, encores included.
    pub fn songs(&self) -> Vec<String> {
        self.sets
            .set
            .iter()
            .flat_map(|set| set.song.iter())
            .map(|song| song.name.clone())
            .filter(|name| !name.trim().is_empty())
            .collect()
    }

    pub fn artist_name(&self) -> &str {
        &self.artist.name
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistArtist {
    #[serde(default)]
    pub mbid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: City,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Country,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tour {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sets {
    #[serde(default)]
    pub set: Vec<SetSongs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetSongs {
    #[serde(default)]
    pub song: Vec<SetlistSong>,
    #[serde(default)]
    pub encore: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetlistSong {
    #[serde(default)]
    pub name: String,
}

#[derive(Tabled)]
pub struct SongTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub spotify: String,
    pub album: String,
}
