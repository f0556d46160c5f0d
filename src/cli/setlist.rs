use tabled::Table;

use crate::{
    context::AppContext,
    error, info,
    setlistfm::{SetlistError, extract_setlist_id},
    success,
    types::{Setlist, Song, SongTableRow},
    warning,
};

pub async fn setlist(ctx: &AppContext, url: &str) {
    let setlist = match load_setlist(ctx, url).await {
        Ok(setlist) => setlist,
        Err(e) => error!("Failed to load setlist: {}", e),
    };

    let songs = setlist.songs();
    success!("{}", setlist.title());
    if songs.is_empty() {
        warning!("The setlist has no songs yet");
        return;
    }

    let rows: Vec<SongTableRow> = songs
        .into_iter()
        .enumerate()
        .map(|(i, title)| SongTableRow {
            position: i + 1,
            title,
            spotify: String::new(),
            album: String::new(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub(crate) async fn load_setlist(ctx: &AppContext, url: &str) -> Result<Setlist, SetlistError> {
    let id = extract_setlist_id(url)?;
    info!("Loading data from setlist [{}]", id);

    let client = ctx.setlistfm()?;
    let setlist = client.get_setlist(&id).await?;
    info!("Setlist [{}] loaded", id);
    Ok(setlist)
}

/// One table row per title, showing what it resolved to.
pub(crate) fn resolution_rows(titles: &[String], resolved: &[Option<Song>]) -> Vec<SongTableRow> {
    titles
        .iter()
        .zip(resolved)
        .enumerate()
        .map(|(i, (title, song))| SongTableRow {
            position: i + 1,
            title: title.clone(),
            spotify: song.as_ref().map(|s| s.title.clone()).unwrap_or_else(|| "-".into()),
            album: song.as_ref().map(|s| s.album.clone()).unwrap_or_default(),
        })
        .collect()
}
