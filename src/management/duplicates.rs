use std::collections::HashSet;

use crate::{error::Result, spotify::Spotify, utils, warning};

/// Result of comparing two playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub first_name: String,
    pub second_name: String,
    pub songs: Vec<String>,
}

/// Turns track ids into sorted `"<name> by <artist>"` strings.
///
/// Issues one track lookup per id, one after the other. A failed lookup
/// aborts the whole resolution and no partial list is returned. A track
/// that comes back without any artist is skipped.
pub async fn resolve(spotify: &Spotify, token: &str, ids: &HashSet<String>) -> Result<Vec<String>> {
    let mut songs = Vec::with_capacity(ids.len());

    for id in ids {
        let track = spotify.track(token, id).await?;
        match track.display_name() {
            Some(name) => songs.push(name),
            None => warning!("Skipping track without artists: {}", id),
        }
    }

    songs.sort();
    Ok(songs)
}

/// Compares two playlists and resolves the tracks they share.
///
/// Fetches both playlist names and both track id sets, intersects the sets
/// and resolves the intersection for display.
pub async fn compare(
    spotify: &Spotify,
    token: &str,
    first_id: &str,
    second_id: &str,
) -> Result<Comparison> {
    let first_name = spotify.playlist_name(token, first_id).await?;
    let second_name = spotify.playlist_name(token, second_id).await?;

    let first_ids = spotify.playlist_track_ids(token, first_id).await?;
    let second_ids = spotify.playlist_track_ids(token, second_id).await?;

    let duplicates = utils::find_duplicates(&first_ids, &second_ids);
    let songs = resolve(spotify, token, &duplicates).await?;

    Ok(Comparison {
        first_name,
        second_name,
        songs,
    })
}
