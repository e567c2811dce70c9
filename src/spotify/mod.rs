//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify accounts service and Web
//! API used by the duplicate finder. It owns all HTTP communication with
//! Spotify and turns every response into a typed record from
//! [`crate::types`].
//!
//! ## Architecture
//!
//! ```text
//! Route handlers (api)
//!          ↓
//! Session / token management
//!          ↓
//! Spotify client
//!     ├── Authentication (authorization code grant)
//!     ├── Playlists (listing, names, paged track ids)
//!     └── Tracks (single track lookup)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorize URL construction, code exchange and token refresh
//!   using the client credentials from [`Config`].
//! - [`playlist`] - The current user's playlists and the track identifiers
//!   of a playlist, following Spotify's `next` links until the last page.
//! - [`tracks`] - Lookup of a single track by id for display.
//!
//! ## Error Handling
//!
//! Every call returns [`crate::Result`]:
//! - HTTP 401 from the Web API becomes [`Error::Auth`], which sends the user
//!   back through the login flow
//! - Any other non-success status or transport failure becomes a remote
//!   error that is rendered as an error page
//!
//! No retries are made; a failing request fails the operation that issued it.
//!
//! ## Thread Safety
//!
//! [`Spotify`] is cheap to clone and shares one connection pool. It carries
//! no per-user state; access tokens are passed into every call.

pub mod auth;
pub mod playlist;
pub mod tracks;

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Client for the Spotify accounts service and Web API.
#[derive(Debug, Clone)]
pub struct Spotify {
    http: Client,
    config: Arc<Config>,
}

impl Spotify {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a Web API URL from path segments, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| Error::Config(format!("invalid SPOTIFY_API_URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("SPOTIFY_API_URL cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs an authenticated GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T> {
        let response = self.http.get(url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth("access token rejected by Spotify".to_string()));
        }

        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
