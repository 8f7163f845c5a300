//! Spotify link parsing
//!
//! Accepts web links (`https://open.spotify.com/album/<id>`, optionally with an
//! `intl-xx` locale segment and query string) and URIs (`spotify:album:<id>`).
//! Short links (`https://spotify.link/<code>`) must be resolved to a web link
//! first; see [`crate::services::spotify::resolve_short_link`].

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid link: {0}")]
    Invalid(String),

    #[error("Failed to resolve short link {link}: {reason}")]
    Resolve { link: String, reason: String },
}

/// What a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Album,
    Track,
    Playlist,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Album => "album",
            LinkKind::Track => "track",
            LinkKind::Playlist => "playlist",
        }
    }
}

impl FromStr for LinkKind {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album" => Ok(LinkKind::Album),
            "track" => Ok(LinkKind::Track),
            "playlist" => Ok(LinkKind::Playlist),
            other => Err(LinkError::Invalid(other.to_string())),
        }
    }
}

/// A parsed album, track or playlist link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumLink {
    pub kind: LinkKind,
    pub id: String,
}

/// A Spotify URI, the payload of scannable codes (e.g. `spotify:album:<id>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotifyUri {
    pub kind: LinkKind,
    pub id: String,
}

impl SpotifyUri {
    pub fn new(kind: LinkKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Browser link for the same resource
    pub fn web_url(&self) -> String {
        format!("https://open.spotify.com/{}/{}", self.kind.as_str(), self.id)
    }
}

impl fmt::Display for SpotifyUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https://open\.spotify\.com/(?:intl-[a-zA-Z]{2}(?:-[a-zA-Z]{2})?/)?|spotify:)(?P<type>album|track|playlist)[:/](?P<id>[a-zA-Z0-9]+)",
        )
        .expect("link pattern is valid")
    })
}

fn short_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://spotify\.link/[a-zA-Z0-9]+").expect("short link pattern is valid")
    })
}

/// True for `https://spotify.link/...` short links that need resolving
pub fn is_short_link(link: &str) -> bool {
    short_link_pattern().is_match(link.trim())
}

impl AlbumLink {
    /// Parse a web link or URI. No network access.
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let link = link.trim();
        let captures = link_pattern()
            .captures(link)
            .ok_or_else(|| LinkError::Invalid(link.to_string()))?;

        let kind = captures["type"].parse()?;
        let id = captures["id"].to_string();
        Ok(Self { kind, id })
    }

    pub fn uri(&self) -> SpotifyUri {
        SpotifyUri::new(self.kind, self.id.clone())
    }
}

impl FromStr for AlbumLink {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
