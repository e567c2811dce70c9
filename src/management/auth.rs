use chrono::Utc;
use url::Url;

use crate::{
    error::{Error, Result},
    management::Session,
    spotify::Spotify,
    success,
    types::Token,
    warning,
};

/// Seconds before the reported expiry at which a token is already treated
/// as expired.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}

/// Manages the OAuth token of one browser session.
///
/// All reads and writes go through the caller's [`Session`], so two users
/// never see each other's tokens.
pub struct TokenManager<'a> {
    spotify: &'a Spotify,
    session: &'a Session,
}

impl<'a> TokenManager<'a> {
    pub fn new(spotify: &'a Spotify, session: &'a Session) -> Self {
        TokenManager { spotify, session }
    }

    /// Returns the authorize URL for a new login attempt.
    ///
    /// A fresh `state` value is stored in the session and embedded in the
    /// URL; the callback only accepts a code that comes back with it.
    pub async fn authorize_url(&self) -> Result<Url> {
        let state = self.session.issue_state().await;
        self.spotify.authorize_url(&state)
    }

    /// Completes a login from the callback parameters.
    ///
    /// Rejects the callback with [`Error::Auth`] when the returned `state`
    /// does not match the pending one, without contacting Spotify. On
    /// success the token is stored in the session.
    pub async fn exchange_code(&self, code: &str, state: Option<&str>) -> Result<Token> {
        let expected = self.session.take_state().await;
        match (expected.as_deref(), state) {
            (Some(expected), Some(state)) if expected == state => {}
            _ => return Err(Error::Auth("OAuth state mismatch".to_string())),
        }

        let token = self.spotify.exchange_code(code).await?;
        self.session.set_token(token.clone()).await;
        success!("Authorization completed for session");
        Ok(token)
    }

    /// Returns a usable token for the session, refreshing it if needed.
    ///
    /// # Behavior
    ///
    /// - No token stored: [`Error::Auth`]
    /// - Token not expired: returned as is
    /// - Token expired with a refresh token: refreshed, stored and returned
    /// - Token expired without a refresh token, or refresh rejected: the
    ///   token is discarded and [`Error::Auth`] is returned
    ///
    /// Transport failures during the refresh are returned as they are and
    /// leave the stored token in place.
    pub async fn valid_token(&self) -> Result<Token> {
        let Some(token) = self.session.token().await else {
            return Err(Error::Auth("no token in session".to_string()));
        };

        if !is_expired(&token) {
            return Ok(token);
        }

        let Some(refresh_token) = token.refresh_token.as_deref() else {
            self.session.clear_token().await;
            return Err(Error::Auth("token expired".to_string()));
        };

        match self.spotify.refresh_token(refresh_token).await {
            Ok(new_token) => {
                self.session.set_token(new_token.clone()).await;
                Ok(new_token)
            }
            Err(e) if e.is_auth() => {
                warning!("Token refresh failed: {}", e);
                self.session.clear_token().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Passes through the result of a Web API call made with the session's
    /// token, discarding the token when Spotify rejected it.
    ///
    /// A token can be revoked long before its expiry time, so a 401 is the
    /// only reliable sign that it is unusable. Without clearing it, `/`
    /// would keep treating the session as logged in.
    pub async fn checked<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_auth() {
                warning!("Access token rejected, discarding it: {}", e);
                self.session.clear_token().await;
            }
        }
        result
    }

    pub async fn is_valid(&self) -> bool {
        self.valid_token().await.is_ok()
    }

    /// Discards the stored token.
    pub async fn clear(&self) {
        self.session.clear_token().await;
    }
}
