use std::collections::HashSet;

use super::Spotify;
use crate::{
    error::Result,
    types::{Paging, Playlist, PlaylistName, PlaylistTrackItem},
};

const PLAYLISTS_PAGE_LIMIT: &str = "50";
const TRACKS_PAGE_LIMIT: &str = "100";

impl Spotify {
    /// Retrieves every playlist owned or followed by the current user.
    ///
    /// Walks `/me/playlists` page by page until Spotify stops returning a
    /// `next` link. The listing order of the API is preserved. Null entries,
    /// which Spotify occasionally returns for deleted playlists, are dropped.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Auth`] when the access token is rejected
    /// - a remote error on any transport or HTTP failure
    pub async fn current_user_playlists(&self, token: &str) -> Result<Vec<Playlist>> {
        let mut url = self.endpoint(&["me", "playlists"])?;
        url.query_pairs_mut().append_pair("limit", PLAYLISTS_PAGE_LIMIT);

        let mut playlists = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next {
            let page: Paging<Option<Playlist>> = self.get_json(&page_url, token).await?;
            playlists.extend(page.items.into_iter().flatten());
            next = page.next;
        }

        Ok(playlists)
    }

    /// Fetches the display name of a playlist.
    pub async fn playlist_name(&self, token: &str, playlist_id: &str) -> Result<String> {
        let mut url = self.endpoint(&["playlists", playlist_id])?;
        url.query_pairs_mut().append_pair("fields", "name");

        let playlist: PlaylistName = self.get_json(url.as_str(), token).await?;
        Ok(playlist.name)
    }

    /// Collects the set of track ids contained in a playlist.
    ///
    /// Requests the first page of `/playlists/{id}/tracks` and then follows
    /// each `next` link, issuing exactly one request per page. Every call
    /// starts again from the first page.
    ///
    /// Entries without a track id (local files, tracks removed from the
    /// catalog) are skipped. A track that appears several times in the
    /// playlist is counted once.
    ///
    /// # Example
    ///
    /// ```
    /// let ids = spotify.playlist_track_ids(&token, "37i9dQZF1DXcBWIGoYBM5M").await?;
    /// println!("{} distinct tracks", ids.len());
    /// ```
    pub async fn playlist_track_ids(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<HashSet<String>> {
        let mut url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        url.query_pairs_mut()
            .append_pair("limit", TRACKS_PAGE_LIMIT)
            .append_pair("fields", "items(track(id)),next");

        let mut ids = HashSet::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next {
            let page: Paging<PlaylistTrackItem> = self.get_json(&page_url, token).await?;
            ids.extend(
                page.items
                    .iter()
                    .filter_map(PlaylistTrackItem::track_id)
                    .map(str::to_string),
            );
            next = page.next;
        }

        Ok(ids)
    }
}
