use chrono::Utc;
use mockito::{Matcher, Server, ServerGuard};
use reqwest::{Client, Response, StatusCode, header, redirect::Policy};
use serde_json::json;
use sporldupes::{
    config::Config,
    management::SESSION_COOKIE_NAME,
    server::{self, AppState},
    types::Token,
};
use tokio::net::TcpListener;

struct TestApp {
    base: String,
    state: AppState,
    client: Client,
}

impl TestApp {
    async fn spawn(spotify: &ServerGuard) -> Self {
        let cfg = Config::new(
            "cid",
            "secret",
            "http://127.0.0.1:5000/callback",
            "playlist-read-private",
        )
        .with_base_url(&spotify.url());
        let state = AppState::new(cfg);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server::serve(listener, state.clone()));

        let client = Client::builder().redirect(Policy::none()).build().unwrap();

        TestApp {
            base: format!("http://{}", addr),
            state,
            client,
        }
    }

    /// Creates a session holding `token` and returns its cookie header value.
    async fn session_with(&self, token: Token) -> String {
        let id = self.state.sessions.create().await;
        self.state
            .sessions
            .update(&id, |data| data.token = Some(token))
            .await;
        format!("{}={}", SESSION_COOKIE_NAME, id)
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut req = self.client.get(format!("{}{}", self.base, path));
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.send().await.unwrap()
    }

    async fn post_form(&self, path: &str, cookie: &str, body: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base, path))
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }
}

fn fresh_token() -> Token {
    Token {
        access_token: "tok".to_string(),
        refresh_token: Some("refresh".to_string()),
        scope: "playlist-read-private".to_string(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

fn location(res: &Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn session_cookie(res: &Response) -> String {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .unwrap_or_default()
        .to_string()
}

async fn mock_playlists(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [
                    { "id": "p1", "name": "Road Trip" },
                    { "id": "p2", "name": "Focus & Flow" },
                    { "id": "p3", "name": "Gym" }
                ],
                "next": null
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_playlist(
    server: &mut ServerGuard,
    id: &str,
    name: &str,
    tracks: &[&str],
) -> Vec<mockito::Mock> {
    let name_mock = server
        .mock("GET", format!("/playlists/{}", id).as_str())
        .match_query(Matcher::UrlEncoded("fields".into(), "name".into()))
        .with_header("content-type", "application/json")
        .with_body(json!({ "name": name }).to_string())
        .create_async()
        .await;

    let items: Vec<_> = tracks
        .iter()
        .map(|t| json!({ "track": { "id": t } }))
        .collect();
    let tracks_mock = server
        .mock("GET", format!("/playlists/{}/tracks", id).as_str())
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": items, "next": null }).to_string())
        .create_async()
        .await;

    vec![name_mock, tracks_mock]
}

async fn mock_track(server: &mut ServerGuard, id: &str, name: &str, artist: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/tracks/{}", id).as_str())
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": id, "name": name, "artists": [ { "name": artist } ] }).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_home_without_session_redirects_to_authorize() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;

    let res = app.get("/", None).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let target = location(&res);
    assert!(target.starts_with(&format!("{}/authorize?", spotify.url())));
    assert!(target.contains("client_id=cid"));
    assert!(target.contains("show_dialog=true"));
    assert!(target.contains("state="));
    assert!(!session_cookie(&res).is_empty());
}

#[tokio::test]
async fn test_login_flow_stores_token_in_session() {
    let mut spotify = Server::new_async().await;
    let token_mock = spotify
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded("code".into(), "good-code".into()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "tok",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "refresh"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;

    let res = app.get("/", None).await;
    let cookie = session_cookie(&res);
    let authorize = reqwest::Url::parse(&location(&res)).unwrap();
    let state = authorize
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let res = app
        .get(
            &format!("/callback?code=good-code&state={}", state),
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/choose_playlists");
    token_mock.assert_async().await;

    let res = app.get("/", Some(&cookie)).await;
    assert_eq!(location(&res), "/choose_playlists");
}

#[tokio::test]
async fn test_callback_with_wrong_state_redirects_home() {
    let mut spotify = Server::new_async().await;
    let token_mock = spotify
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;

    let res = app.get("/", None).await;
    let cookie = session_cookie(&res);

    let res = app
        .get("/callback?code=good-code&state=forged", Some(&cookie))
        .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_callback_with_denied_authorization_redirects_home() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;

    let res = app.get("/callback?error=access_denied", None).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_protected_routes_redirect_without_token() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;

    for path in ["/choose_playlists", "/find_duplicates/p1/p2"] {
        let res = app.get(path, None).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&res), "/", "{}", path);
    }

    let res = app
        .post_form("/choose_playlists", "", "playlist=p1&playlist=p2")
        .await;
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_choose_playlists_renders_playlists() {
    let mut spotify = Server::new_async().await;
    let _m = mock_playlists(&mut spotify).await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/choose_playlists", Some(&cookie)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Road Trip"));
    assert!(body.contains("Focus &amp; Flow"));
    assert!(body.contains("value=\"p3\""));
}

#[tokio::test]
async fn test_selecting_two_playlists_redirects_to_comparison() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app
        .post_form("/choose_playlists", &cookie, "playlist=p1&playlist=p3")
        .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/find_duplicates/p1/p3");
}

#[tokio::test]
async fn test_selecting_one_or_three_playlists_rerenders_chooser() {
    let mut spotify = Server::new_async().await;
    let _m = mock_playlists(&mut spotify).await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    for body in ["playlist=p1", "playlist=p1&playlist=p2&playlist=p3", ""] {
        let res = app.post_form("/choose_playlists", &cookie, body).await;
        assert_eq!(res.status(), StatusCode::OK, "{}", body);
        let html = res.text().await.unwrap();
        assert!(html.contains("Please select exactly two playlists."));
        assert!(html.contains("Road Trip"));
    }
}

#[tokio::test]
async fn test_find_duplicates_renders_shared_songs() {
    let mut spotify = Server::new_async().await;
    let _a = mock_playlist(&mut spotify, "a", "Playlist A", &["t1", "t2", "t3"]).await;
    let _b = mock_playlist(&mut spotify, "b", "Playlist B", &["t2", "t3", "t4"]).await;
    let _t2 = mock_track(&mut spotify, "t2", "Second", "Artist Two").await;
    let _t3 = mock_track(&mut spotify, "t3", "Third", "Artist Three").await;
    let untouched = spotify
        .mock("GET", Matcher::Regex("^/tracks/t[14]$".into()))
        .expect(0)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/find_duplicates/a/b", Some(&cookie)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Playlist A"));
    assert!(body.contains("Playlist B"));
    assert!(body.contains("Second by Artist Two"));
    assert!(body.contains("Third by Artist Three"));
    assert!(body.contains("2 songs in both playlists"));
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_find_duplicates_without_overlap_renders_no_duplicates() {
    let mut spotify = Server::new_async().await;
    let _a = mock_playlist(&mut spotify, "a", "Playlist A", &["t1"]).await;
    let _b = mock_playlist(&mut spotify, "b", "Playlist B", &["t4"]).await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/find_duplicates/a/b", Some(&cookie)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("No duplicates found."));
}

#[tokio::test]
async fn test_failed_track_lookup_renders_error_page() {
    let mut spotify = Server::new_async().await;
    let _a = mock_playlist(&mut spotify, "a", "Playlist A", &["t1", "t2"]).await;
    let _b = mock_playlist(&mut spotify, "b", "Playlist B", &["t2"]).await;
    let _t2 = spotify
        .mock("GET", "/tracks/t2")
        .with_status(503)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/find_duplicates/a/b", Some(&cookie)).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = res.text().await.unwrap();
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("<li>"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/logout", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let res = app.get("/choose_playlists", Some(&cookie)).await;
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mut spotify = Server::new_async().await;
    let refresh = spotify
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "access_token": "renewed", "token_type": "Bearer", "expires_in": 3600 })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let playlists = spotify
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer renewed")
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": [], "next": null }).to_string())
        .expect(2)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;

    let mut expired = fresh_token();
    expired.obtained_at -= 7200;
    let cookie = app.session_with(expired).await;

    let res = app.get("/choose_playlists", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);

    // the renewed token is stored, so a second request does not refresh again
    let res = app.get("/choose_playlists", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);

    refresh.assert_async().await;
    playlists.assert_async().await;
}

#[tokio::test]
async fn test_rejected_refresh_redirects_home() {
    let mut spotify = Server::new_async().await;
    let _refresh = spotify
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(json!({ "error": "invalid_grant" }).to_string())
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;

    let mut expired = fresh_token();
    expired.obtained_at -= 7200;
    let cookie = app.session_with(expired).await;

    let res = app.get("/choose_playlists", Some(&cookie)).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_revoked_token_is_discarded_and_login_restarts() {
    let mut spotify = Server::new_async().await;
    let rejected = spotify
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(
            json!({ "error": { "status": 401, "message": "Invalid access token" } }).to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/choose_playlists", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let res = app.get("/", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with(&format!("{}/authorize?", spotify.url())));
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_revoked_token_on_comparison_restarts_login() {
    let mut spotify = Server::new_async().await;
    let _name = spotify
        .mock("GET", "/playlists/a")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;
    let cookie = app.session_with(fresh_token()).await;

    let res = app.get("/find_duplicates/a/b", Some(&cookie)).await;
    assert_eq!(location(&res), "/");

    let res = app.get("/", Some(&cookie)).await;
    assert!(location(&res).starts_with(&format!("{}/authorize?", spotify.url())));
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_redirects_home() {
    let mut spotify = Server::new_async().await;
    let token_mock = spotify
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;
    let app = TestApp::spawn(&spotify).await;

    let mut expired = fresh_token();
    expired.refresh_token = None;
    expired.obtained_at -= 7200;
    let cookie = app.session_with(expired).await;

    let res = app.get("/choose_playlists", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let id = cookie.trim_start_matches(&format!("{}=", SESSION_COOKIE_NAME));
    let data = app.state.sessions.get(id).await.unwrap();
    assert!(data.token.is_none());
    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_health() {
    let spotify = Server::new_async().await;
    let app = TestApp::spawn(&spotify).await;

    let res = app.get("/health", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("sessions").is_none());
}
