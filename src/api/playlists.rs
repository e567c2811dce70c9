use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::pages,
    error::Result,
    management::{self, Session, TokenManager},
    server::AppState,
    utils,
};

const SELECTION_NOTICE: &str = "Please select exactly two playlists.";

pub async fn choose_playlists(
    State(app): State<AppState>,
    session: Session,
) -> Result<Html<String>> {
    let manager = TokenManager::new(&app.spotify, &session);
    let token = manager.valid_token().await?;
    let playlists = manager
        .checked(app.spotify.current_user_playlists(&token.access_token).await)
        .await?;

    Ok(Html(pages::choose_playlists(&playlists, None)))
}

pub async fn select_playlists(
    State(app): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<Response> {
    let manager = TokenManager::new(&app.spotify, &session);
    let token = manager.valid_token().await?;
    let selected = utils::parse_playlist_selection(&body);

    if let [first, second] = selected.as_slice() {
        return Ok(Redirect::to(&utils::comparison_path(first, second)).into_response());
    }

    let playlists = manager
        .checked(app.spotify.current_user_playlists(&token.access_token).await)
        .await?;

    Ok(Html(pages::choose_playlists(&playlists, Some(SELECTION_NOTICE))).into_response())
}

pub async fn find_duplicates(
    State(app): State<AppState>,
    session: Session,
    Path((first, second)): Path<(String, String)>,
) -> Result<Html<String>> {
    let manager = TokenManager::new(&app.spotify, &session);
    let token = manager.valid_token().await?;
    let comparison = manager
        .checked(management::compare(&app.spotify, &token.access_token, &first, &second).await)
        .await?;

    Ok(Html(pages::duplicates(&comparison)))
}
