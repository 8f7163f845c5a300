//! Spotify Web API client
//!
//! Blocking reqwest client using the client-credentials flow. One instance is
//! created per process; the access token is fetched lazily on first use.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::album::{format_playtime, format_release_date};
use crate::models::link::is_short_link;
use crate::models::{AlbumData, AlbumLink, LinkError, LinkKind, Localized, SpotifyConfig, SpotifyUri};

/// Redirect hops followed when resolving a short link
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Spotify credentials missing (set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET)")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Source of album metadata and artwork
pub trait MetadataProvider {
    /// Turn user input into a link. Short links may need network access.
    fn resolve(&self, input: &str) -> Result<AlbumLink, LinkError> {
        AlbumLink::parse(input)
    }

    fn lookup(&self, link: &AlbumLink) -> Result<AlbumData, MetadataError>;

    fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, MetadataError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TrackRef {
    name: String,
    #[serde(default)]
    duration_ms: u64,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    id: String,
    name: String,
    artists: Vec<ArtistRef>,
    #[serde(default)]
    images: Vec<ImageRef>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    release_date_precision: String,
    tracks: Paging<TrackRef>,
}

#[derive(Debug, Deserialize)]
struct AlbumId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    album: AlbumId,
}

#[derive(Debug, Deserialize)]
struct Owner {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<TrackRef>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    id: String,
    name: String,
    owner: Owner,
    #[serde(default)]
    images: Vec<ImageRef>,
    tracks: Paging<PlaylistItem>,
}

pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
    token: RefCell<Option<String>>,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self, MetadataError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            config,
            token: RefCell::new(None),
        })
    }

    fn access_token(&self) -> Result<String, MetadataError> {
        if let Some(token) = self.token.borrow().as_ref() {
            return Ok(token.clone());
        }

        let (client_id, client_secret) = self
            .config
            .credentials()
            .ok_or(MetadataError::MissingCredentials)?;

        let url = format!("{}/api/token", self.config.accounts_base.trim_end_matches('/'));
        tracing::debug!(url = %url, "Requesting Spotify access token");
        let response = self
            .http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()?;
        let token: TokenResponse = decode_json(&url, check_status(&url, response)?)?;

        *self.token.borrow_mut() = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MetadataError> {
        let token = self.access_token()?;
        tracing::debug!(url = %url, "GET");
        let response = self.http.get(url).bearer_auth(token).send()?;
        decode_json(url, check_status(url, response)?)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Collect items from a paging object and every following page
    fn collect_pages<T: DeserializeOwned>(&self, first: Paging<T>) -> Result<Vec<T>, MetadataError> {
        let mut items = first.items;
        let mut next = first.next;
        while let Some(url) = next {
            let page: Paging<T> = self.get_json(&url)?;
            items.extend(page.items);
            next = page.next;
        }
        Ok(items)
    }

    fn lookup_album(&self, id: &str) -> Result<AlbumData, MetadataError> {
        let album: AlbumResponse = self.get_json(&self.api_url(&format!("albums/{id}")))?;
        let tracks = self.collect_pages(album.tracks)?;

        let artist = album
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let total_ms = tracks.iter().map(|t| t.duration_ms).sum();

        tracing::info!(album = %album.name, artist = %artist, tracks = tracks.len(), "Fetched album");

        Ok(AlbumData {
            artist: Localized::detect(artist),
            title: Localized::detect(album.name),
            tracks: tracks.into_iter().map(|t| t.name).collect(),
            playtime: format_playtime(total_ms),
            label: Localized::detect(album.label.unwrap_or_default()),
            release_date: format_release_date(&album.release_date, &album.release_date_precision),
            artwork_url: first_image(&album.images),
            uri: SpotifyUri::new(LinkKind::Album, album.id),
        })
    }

    fn lookup_playlist(&self, id: &str) -> Result<AlbumData, MetadataError> {
        let playlist: PlaylistResponse = self.get_json(&self.api_url(&format!("playlists/{id}")))?;
        let items = self.collect_pages(playlist.tracks)?;

        // Removed or local tracks come back as null
        let tracks: Vec<TrackRef> = items.into_iter().filter_map(|item| item.track).collect();
        let total_ms = tracks.iter().map(|t| t.duration_ms).sum();
        let owner = playlist.owner.display_name.unwrap_or(playlist.owner.id);

        tracing::info!(playlist = %playlist.name, owner = %owner, tracks = tracks.len(), "Fetched playlist");

        Ok(AlbumData {
            artist: Localized::detect(owner),
            title: Localized::detect(playlist.name),
            tracks: tracks.into_iter().map(|t| t.name).collect(),
            playtime: format_playtime(total_ms),
            label: Localized::detect(String::new()),
            release_date: String::new(),
            artwork_url: first_image(&playlist.images),
            uri: SpotifyUri::new(LinkKind::Playlist, playlist.id),
        })
    }
}

impl MetadataProvider for SpotifyClient {
    fn resolve(&self, input: &str) -> Result<AlbumLink, LinkError> {
        if is_short_link(input) {
            resolve_short_link(&self.http, input.trim())
        } else {
            AlbumLink::parse(input)
        }
    }

    fn lookup(&self, link: &AlbumLink) -> Result<AlbumData, MetadataError> {
        match link.kind {
            LinkKind::Album => self.lookup_album(&link.id),
            LinkKind::Track => {
                let track: TrackResponse =
                    self.get_json(&self.api_url(&format!("tracks/{}", link.id)))?;
                self.lookup_album(&track.album.id)
            }
            LinkKind::Playlist => self.lookup_playlist(&link.id),
        }
    }

    fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, MetadataError> {
        if url.is_empty() {
            return Err(MetadataError::Decode {
                url: String::new(),
                reason: "no artwork available".to_string(),
            });
        }
        tracing::debug!(url = %url, "Fetching artwork");
        let response = check_status(url, self.http.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Follow redirects from a short link until they reach a parseable link.
///
/// The client must not follow redirects on its own; the final link itself is
/// never requested.
pub fn resolve_short_link(http: &Client, link: &str) -> Result<AlbumLink, LinkError> {
    let resolve_error = |reason: String| LinkError::Resolve {
        link: link.to_string(),
        reason,
    };

    let mut url = Url::parse(link).map_err(|e| resolve_error(e.to_string()))?;
    for _ in 0..MAX_REDIRECTS {
        if let Ok(parsed) = AlbumLink::parse(url.as_str()) {
            tracing::debug!(short = %link, resolved = %url, "Resolved short link");
            return Ok(parsed);
        }

        let response = http
            .get(url.clone())
            .send()
            .map_err(|e| resolve_error(e.to_string()))?;
        if !response.status().is_redirection() {
            return Err(LinkError::Invalid(response.url().to_string()));
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| resolve_error("redirect without Location header".to_string()))?;
        url = response
            .url()
            .join(location)
            .map_err(|e| resolve_error(e.to_string()))?;
    }

    Err(resolve_error("too many redirects".to_string()))
}

fn check_status(url: &str, response: Response) -> Result<Response, MetadataError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(MetadataError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

fn decode_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, MetadataError> {
    let body = response.bytes()?;
    serde_json::from_slice(&body).map_err(|e| MetadataError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Spotify lists images largest first
fn first_image(images: &[ImageRef]) -> String {
    images.first().map(|i| i.url.clone()).unwrap_or_default()
}
