use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    management::{Session, TokenManager},
    server::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    State(app): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(reason) = params.error {
        return Err(Error::Auth(format!("authorization denied: {}", reason)));
    }

    let Some(code) = params.code else {
        return Err(Error::Auth("missing authorization code".to_string()));
    };

    TokenManager::new(&app.spotify, &session)
        .exchange_code(&code, params.state.as_deref())
        .await?;

    Ok(Redirect::to("/choose_playlists"))
}
