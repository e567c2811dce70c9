use super::Spotify;
use crate::{error::Result, types::Track};

impl Spotify {
    /// Looks up a single track by its Spotify id.
    pub async fn track(&self, token: &str, track_id: &str) -> Result<Track> {
        let url = self.endpoint(&["tracks", track_id])?;
        self.get_json(url.as_str(), token).await
    }
}
