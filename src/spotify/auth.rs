use chrono::Utc;
use reqwest::StatusCode;
use url::Url;

use super::Spotify;
use crate::{
    error::{Error, Result},
    types::{Token, TokenResponse},
};

impl Spotify {
    /// Builds the URL that starts the authorization code flow.
    ///
    /// The user is sent here from the home route. Spotify asks for consent
    /// (always, because of `show_dialog=true`) and then redirects back to the
    /// configured redirect URI with `code` and the unchanged `state`.
    ///
    /// # Arguments
    ///
    /// * `state` - Opaque value bound to the caller's session, checked again
    ///   by the callback route
    ///
    /// # Example
    ///
    /// ```
    /// let url = spotify.authorize_url("k3yF0rTh1sSess10n")?;
    /// assert!(url.as_str().contains("response_type=code"));
    /// ```
    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        let cfg = self.config();
        let mut url = Url::parse(&cfg.auth_url)
            .map_err(|e| Error::Config(format!("invalid SPOTIFY_API_AUTH_URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &cfg.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &cfg.redirect_uri)
            .append_pair("scope", &cfg.scope)
            .append_pair("state", state)
            .append_pair("show_dialog", "true");
        Ok(url)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Completes the authorization code grant with HTTP Basic client
    /// authentication. A code that is invalid, expired or already used is
    /// rejected by Spotify with 400 and reported as [`Error::Auth`].
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let cfg = self.config();
        let response = self
            .http
            .post(&cfg.token_url)
            .basic_auth(&cfg.client_id, Some(&cfg.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", cfg.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let body = Self::token_body(response, "authorization code").await?;
        Ok(token_from_response(body, None))
    }

    /// Refreshes an expired access token.
    ///
    /// Spotify may or may not rotate the refresh token. When the response
    /// carries none, the refresh token that was used stays valid and is
    /// kept in the returned record.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
        let cfg = self.config();
        let response = self
            .http
            .post(&cfg.token_url)
            .basic_auth(&cfg.client_id, Some(&cfg.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let body = Self::token_body(response, "refresh token").await?;
        Ok(token_from_response(body, Some(refresh_token)))
    }

    async fn token_body(response: reqwest::Response, grant: &str) -> Result<TokenResponse> {
        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("{} rejected: {}", grant, detail)));
        }
        if !status.is_success() {
            return Err(Error::Remote(format!(
                "token endpoint returned {} for {} grant",
                status, grant
            )));
        }
        Ok(response.json::<TokenResponse>().await?)
    }
}

fn token_from_response(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string)),
        scope: body.scope.unwrap_or_default(),
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
