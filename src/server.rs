use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::get,
};
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;

use crate::{Res, api, config::Config, info, management::SessionStore, spotify::Spotify};

/// State shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub spotify: Spotify,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            spotify: Spotify::new(Arc::new(config)),
            sessions: SessionStore::new(),
        }
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/callback", get(api::callback))
        .route(
            "/choose_playlists",
            get(api::choose_playlists).post(api::select_playlists),
        )
        .route("/find_duplicates/{first}/{second}", get(api::find_duplicates))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Serves the application on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Binds the configured address and serves until the process is stopped.
pub async fn start_server(config: Config) -> Res<()> {
    let listener = TcpListener::bind(&config.server_address).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    serve(listener, AppState::new(config)).await?;
    Ok(())
}
