//! Configuration management for the Playlist Duplicate Finder.
//!
//! This module handles loading and validating configuration values from
//! environment variables and `.env` files. All Spotify credentials are read
//! once at startup into a [`Config`] record, so a missing value fails fast
//! with a clear message instead of surfacing later as a cryptic API error.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

const CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
const CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
const REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
const SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the current working directory first and then
/// in the platform-specific local data directory under `sporldupes/.env`.
/// Variables that are already set in the process environment are never
/// overwritten, and a missing file is not an error.
///
/// # Directory Structure
///
/// The data directory file is located at:
/// - Linux: `~/.local/share/sporldupes/.env`
/// - macOS: `~/Library/Application Support/sporldupes/.env`
/// - Windows: `%LOCALAPPDATA%/sporldupes/.env`
///
/// # Returns
///
/// Returns the paths of the files that were actually loaded.
pub fn load_env() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenv::dotenv() {
        loaded.push(path);
    }

    let path = data_env_path();
    if path.is_file() && dotenv::from_path(&path).is_ok() {
        loaded.push(path);
    }

    loaded
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporldupes/.env");
    path
}

/// Validated runtime configuration.
///
/// Holds the OAuth client credentials, the requested scope and the
/// endpoints of the Spotify accounts service and Web API. The endpoint
/// fields default to the public Spotify hosts and only need overriding
/// when pointing the application at a mock server.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub server_address: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
}

impl Config {
    /// Builds a configuration from explicit credentials and default endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            auth_url: DEFAULT_SPOTIFY_API_AUTH_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_API_TOKEN_URL.to_string(),
        }
    }

    /// Points both the accounts service and the Web API at a single base URL.
    ///
    /// The authorize, token and API endpoints become `{base}/authorize`,
    /// `{base}/api/token` and `{base}` respectively.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_url = base.to_string();
        self.auth_url = format!("{}/authorize", base);
        self.token_url = format!("{}/api/token", base);
        self
    }

    /// Reads and validates the configuration from the process environment.
    ///
    /// The client id, client secret, redirect URI and scope are required.
    /// Every missing or empty required variable is reported in a single
    /// [`Error::Config`] so that all of them can be fixed at once.
    ///
    /// # Optional Variables
    ///
    /// - `SERVER_ADDRESS` - bind address, defaults to `127.0.0.1:5000`
    /// - `SPOTIFY_API_URL` - Web API base URL
    /// - `SPOTIFY_API_AUTH_URL` - OAuth authorization endpoint
    /// - `SPOTIFY_API_TOKEN_URL` - OAuth token endpoint
    ///
    /// # Example
    ///
    /// ```
    /// let cfg = Config::from_env()?;
    /// println!("Redirecting to {}", cfg.redirect_uri);
    /// ```
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = [CLIENT_ID, CLIENT_SECRET, REDIRECT_URI, SCOPE]
            .into_iter()
            .filter(|key| get(key).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            client_id: get(CLIENT_ID).unwrap_or_default(),
            client_secret: get(CLIENT_SECRET).unwrap_or_default(),
            redirect_uri: get(REDIRECT_URI).unwrap_or_default(),
            scope: get(SCOPE).unwrap_or_default(),
            server_address: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_TOKEN_URL.to_string()),
        })
    }
}
