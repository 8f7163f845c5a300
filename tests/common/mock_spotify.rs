//! Mock Spotify Web API, accounts service, image CDN and scannables service.

use album_poster::models::SpotifyConfig;
use wiremock::{
    matchers::{header, method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

use super::fixtures::{self, ACCESS_TOKEN, ALBUM_ID, PLAYLIST_ID, TRACK_ID};

/// Wrapper around wiremock MockServer with Spotify-shaped endpoints
pub struct MockSpotify {
    pub server: MockServer,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Client config with every base URL pointing at this server
    pub fn config(&self) -> SpotifyConfig {
        SpotifyConfig {
            client_id: Some("client-id".to_string()),
            client_secret: Some("client-secret".to_string()),
            api_base: self.url(),
            accounts_base: self.url(),
            scannables_base: self.url(),
        }
    }

    /// Token endpoint; `expected_calls` verifies token reuse on drop
    pub async fn mock_token(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Authenticated GET returning JSON
    pub async fn mock_api_json(&self, endpoint: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, endpoint: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Album with two track pages, plus its artwork
    pub async fn mock_album(&self) {
        self.mock_api_json(&format!("/v1/albums/{ALBUM_ID}"), fixtures::album_json(&self.url()))
            .await;
        self.mock_api_json(
            &format!("/v1/albums/{ALBUM_ID}/tracks"),
            fixtures::album_tracks_page_two(),
        )
        .await;
        self.mock_artwork().await;
    }

    pub async fn mock_track(&self) {
        self.mock_api_json(&format!("/v1/tracks/{TRACK_ID}"), fixtures::track_json())
            .await;
    }

    pub async fn mock_playlist(&self) {
        self.mock_api_json(
            &format!("/v1/playlists/{PLAYLIST_ID}"),
            fixtures::playlist_json(&self.url()),
        )
        .await;
        self.mock_artwork().await;
    }

    pub async fn mock_artwork(&self) {
        Mock::given(method("GET"))
            .and(path("/artwork/cover.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(fixtures::artwork_png())
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    /// Scannables endpoint for any code request
    pub async fn mock_scan_code(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/uri/plain/png/[0-9a-f]{6}/(black|white)/\d+/spotify:"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(fixtures::scan_code_png())
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_scan_code_missing(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/uri/plain/png/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }

    /// `from` answers with a redirect to `location`
    pub async fn mock_redirect(&self, from: &str, location: &str) {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(ResponseTemplate::new(301).insert_header("location", location))
            .mount(&self.server)
            .await;
    }
}
