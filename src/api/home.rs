use axum::{extract::State, response::Redirect};

use crate::{
    error::Result,
    management::{Session, TokenManager},
    server::AppState,
};

pub async fn home(State(app): State<AppState>, session: Session) -> Result<Redirect> {
    let manager = TokenManager::new(&app.spotify, &session);

    if manager.is_valid().await {
        return Ok(Redirect::to("/choose_playlists"));
    }

    let auth_url = manager.authorize_url().await?;
    Ok(Redirect::to(auth_url.as_str()))
}

pub async fn logout(State(app): State<AppState>, session: Session) -> Redirect {
    TokenManager::new(&app.spotify, &session).clear().await;
    session.destroy().await;
    Redirect::to("/")
}
