use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{api::pages, warning};

/// Errors surfaced by the application.
///
/// Each variant maps to one handling policy:
/// - `Auth` sends the browser back to `/` to re-authenticate
/// - `Config` is raised at startup and stops the process
/// - `Remote` and `Http` render a visible error page
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("authentication required: {0}")]
    Auth(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("Spotify API error: {0}")]
    Remote(String),

    #[error("Spotify request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Auth(reason) => {
                warning!("Redirecting to login: {}", reason);
                Redirect::to("/").into_response()
            }
            Error::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(&msg)),
            )
                .into_response(),
            err @ (Error::Remote(_) | Error::Http(_)) => {
                warning!("{}", err);
                (StatusCode::BAD_GATEWAY, Html(pages::error_page(&err.to_string()))).into_response()
            }
        }
    }
}
