use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{debug, spotify::Catalog, types::Song, warning};

/// Number of catalog searches allowed in flight at the same time.
pub const MAX_CONCURRENT_SEARCHES: usize = 5;

/// Search query for one setlist title, e.g. `"song 1" artist:"band x"`.
pub fn search_query(title: &str, artist: &str) -> String {
    format!(
        "\"{}\" artist:\"{}\"",
        title.trim().to_lowercase(),
        artist.trim().to_lowercase()
    )
}

/// Whether a catalog hit is plausibly the song played, i.e. its title contains
/// the setlist title (case-insensitive). `"Song 1 (Live)"` matches `"song 1"`.
pub fn title_matches(found: &str, title: &str) -> bool {
    found.to_lowercase().contains(&title.trim().to_lowercase())
}

/// Maps setlist titles onto catalog tracks with bounded parallelism.
pub struct TrackResolver<C: ?Sized> {
    catalog: Arc<C>,
    max_concurrency: usize,
    require_title_match: bool,
}

impl<C> TrackResolver<C>
where
    C: Catalog + ?Sized + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            max_concurrency: MAX_CONCURRENT_SEARCHES,
            require_title_match: false,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Drops hits whose title does not contain the setlist title, leaving the
    /// slot empty instead of holding an unrelated top result.
    pub fn with_title_match(mut self, require: bool) -> Self {
        self.require_title_match = require;
        self
    }

    /// Resolves every title to its best catalog match.
    ///
    /// The result has one slot per input title, in input order. A slot is `None`
    /// when the search found nothing or failed; a failed search does not stop
    /// the others. Returns once every search has finished.
    pub async fn resolve(&self, titles: &[String], artist: &str) -> Vec<Option<Song>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut searches = JoinSet::new();

        for (index, title) in titles.iter().enumerate() {
            // the semaphore is never closed
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            let catalog = Arc::clone(&self.catalog);
            let query = search_query(title, artist);
            let title = title.clone();
            let require_title_match = self.require_title_match;

            searches.spawn(async move {
                let _permit = permit;
                debug!("Searching for track: {}", query);

                let found = match catalog.search_track(&query).await {
                    Ok(found) => found,
                    Err(e) => {
                        warning!("Failed to search for \"{}\": {}", title, e);
                        None
                    }
                };

                let found = found.filter(|song| {
                    let keep = !require_title_match || title_matches(&song.title, &title);
                    if !keep {
                        debug!("Dropping \"{}\": not a match for \"{}\"", song.title, title);
                    }
                    keep
                });

                if let Some(song) = &found {
                    debug!("Found \"{}\" on album \"{}\" ({})", song.title, song.album, song.id);
                }

                (index, found)
            });
        }

        let mut resolved: Vec<Option<Song>> = vec![None; titles.len()];
        while let Some(joined) = searches.join_next().await {
            match joined {
                Ok((index, found)) => resolved[index] = found,
                Err(e) => warning!("Search task join error: {}", e),
            }
        }

        resolved
    }
}

/// Titles whose slot in `resolved` is empty, in input order.
pub fn unresolved<'a>(titles: &'a [String], resolved: &[Option<Song>]) -> Vec<&'a str> {
    titles
        .iter()
        .zip(resolved)
        .filter(|(_, song)| song.is_none())
        .map(|(title, _)| title.as_str())
        .collect()
}
