//! Poster layout
//!
//! Turns album data, artwork, palette and theme into a [`PosterScene`]: every
//! element with its final position and size. The scene is plain data and is
//! drawn by the SVG template.
//!
//! Layout, top to bottom (`s` = 3% of the canvas width):
//! artwork, artist, title with playtime, palette strip, track list, scan
//! code, record label and release date.

use cover_palette::{Palette, Theme};
use serde::Serialize;

use crate::error::RenderError;
use crate::layout::{layout_lines, LineOptions};
use crate::models::{AlbumData, CanvasSpec, EncodedImage, FontFace, FontStyle, FontsConfig, TrackLayoutConfig};
use crate::services::fonts::TextMetrics;

/// Share of the inner width the artist name may take
const ARTIST_WIDTH_SHARE: f32 = 0.65;
/// Share of the inner width the title may take
const TITLE_WIDTH_SHARE: f32 = 0.75;
/// Base font sizes are the allotted width divided by these
const ARTIST_SIZE_DIVISOR: f32 = 9.0;
const TITLE_SIZE_DIVISOR: f32 = 27.0;
const ARTWORK_HEIGHT_SHARE: f32 = 0.6;
const ARTWORK_CORNER_RADIUS: f32 = 0.08;
const PALETTE_STRIP_HEIGHT: f32 = 0.01;
const SCAN_CODE_WIDTH_SHARE: f32 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    pub text: String,
    pub x: f32,
    /// Baseline
    pub y: f32,
    pub size: f32,
    pub family: String,
    pub weight: u16,
    /// SVG `text-anchor`
    pub anchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageElement {
    pub href: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: [u8; 3],
}

/// Fully resolved poster, consumed by the `poster.svg` template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterScene {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    pub artwork: ImageElement,
    pub artist: Option<TextElement>,
    pub title: Option<TextElement>,
    pub playtime: Option<TextElement>,
    pub palette: Vec<RectElement>,
    pub tracks: Vec<TextElement>,
    pub scan_code: Option<ImageElement>,
    pub label: Option<TextElement>,
    pub release_date: Option<TextElement>,
}

pub struct PosterCompositor<'a> {
    canvas: CanvasSpec,
    fonts: &'a FontsConfig,
    track_layout: &'a TrackLayoutConfig,
    metrics: &'a dyn TextMetrics,
}

impl<'a> PosterCompositor<'a> {
    pub fn new(
        canvas: CanvasSpec,
        fonts: &'a FontsConfig,
        track_layout: &'a TrackLayoutConfig,
        metrics: &'a dyn TextMetrics,
    ) -> Self {
        Self {
            canvas,
            fonts,
            track_layout,
            metrics,
        }
    }

    pub fn compose(
        &self,
        album: &AlbumData,
        artwork: &EncodedImage,
        palette: &Palette,
        theme: &Theme,
        scan_code: Option<&EncodedImage>,
    ) -> Result<PosterScene, RenderError> {
        let width = self.canvas.width as f32;
        let height = self.canvas.height as f32;
        let s = self.canvas.spacing();
        let inner = width - 2.0 * s;

        let artist_face = self.fonts.face_for(&album.artist.lang, FontStyle::Bold);
        let title_face = self.fonts.face_for(&album.title.lang, FontStyle::Thin);
        let label_face = self.fonts.face_for(&album.label.lang, FontStyle::Thin);
        let mono_face = &self.fonts.monospace;
        let tracks_face = &self.fonts.tracks;

        for (face, text) in [
            (artist_face, album.artist.text.as_str()),
            (title_face, album.title.text.as_str()),
            (mono_face, album.playtime.as_str()),
            (label_face, album.label.text.as_str()),
            (label_face, album.release_date.as_str()),
        ] {
            if !text.is_empty() {
                self.metrics.prepare(face)?;
            }
        }
        if !album.tracks.is_empty() {
            self.metrics.prepare(tracks_face)?;
        }

        // Artwork: square, centered, as wide as possible but at most 60% of the height
        let art_size = (width - 3.0 * s)
            .min((height - 3.0 * s) * ARTWORK_HEIGHT_SHARE)
            .floor();
        let art_top = 1.5 * s;
        let artwork = ImageElement {
            href: artwork.data_uri(),
            x: round2((width - art_size) / 2.0),
            y: round2(art_top),
            width: art_size,
            height: art_size,
            radius: round2(art_size * ARTWORK_CORNER_RADIUS),
        };

        let mut y = art_top + art_size + 0.5 * s;

        let artist_allotted = inner * ARTIST_WIDTH_SHARE;
        let artist_base = (artist_allotted / ARTIST_SIZE_DIVISOR).floor();
        let artist_size = self.fit_size(artist_face, artist_base, artist_allotted, &album.artist.text);
        let artist = self.text_line(&album.artist.text, artist_face, artist_size, s, y, "start");
        if artist.is_some() {
            y += self.metrics.ascent(artist_face, artist_size) + s;
        }

        let title_allotted = inner * TITLE_WIDTH_SHARE;
        let title_base = (title_allotted / TITLE_SIZE_DIVISOR).floor();
        let title_size = self.fit_size(title_face, title_base, title_allotted, &album.title.text);
        let title = self.text_line(&album.title.text, title_face, title_size, s, y, "start");
        let title_baseline = y + self.metrics.ascent(title_face, title_size);

        // Playtime shares the title baseline, flush right
        let playtime_size = (title_base / 1.5).floor();
        let playtime = (!album.playtime.is_empty()).then(|| TextElement {
            text: album.playtime.clone(),
            x: round2(width - s),
            y: round2(title_baseline),
            size: playtime_size,
            family: mono_face.family.clone(),
            weight: mono_face.weight,
            anchor: "end",
        });

        y += 2.0 * s;

        let strip_height = height * PALETTE_STRIP_HEIGHT;
        let swatch_width = inner / palette.len() as f32;
        let palette_strip = palette
            .iter()
            .enumerate()
            .map(|(i, color)| RectElement {
                x: round2(s + i as f32 * swatch_width),
                y: round2(y),
                width: round2(swatch_width),
                height: round2(strip_height),
                fill: color.to_bytes(),
            })
            .collect();
        y += strip_height + 0.5 * s;

        // Footer: release date baseline 1.5s above the bottom, label above it
        let label_size = (title_base / 1.3).floor();
        let date_baseline = height - 1.5 * s;
        let label_baseline = date_baseline - self.metrics.line_height(label_face, label_size);
        let release_date = (!album.release_date.is_empty()).then(|| TextElement {
            text: album.release_date.clone(),
            x: s,
            y: round2(date_baseline),
            size: label_size,
            family: label_face.family.clone(),
            weight: label_face.weight,
            anchor: "start",
        });
        let label = (!album.label.text.is_empty()).then(|| TextElement {
            text: album.label.text.clone(),
            x: s,
            y: round2(label_baseline),
            size: label_size,
            family: label_face.family.clone(),
            weight: label_face.weight,
            anchor: "start",
        });
        let footer_top = if label.is_some() {
            label_baseline - self.metrics.ascent(label_face, label_size)
        } else if release_date.is_some() {
            date_baseline - self.metrics.ascent(label_face, label_size)
        } else {
            date_baseline
        };

        // Scan code sits directly above the footer, below the palette strip
        let scan_code =
            scan_code.and_then(|code| self.place_scan_code(code, y, footer_top - 0.5 * s));

        let reserved_top = scan_code.as_ref().map_or(footer_top, |code| code.y);
        let tracks = self.track_lines(album, title_base, s, y, reserved_top - 0.5 * s);

        Ok(PosterScene {
            width: self.canvas.width,
            height: self.canvas.height,
            background: theme.background().to_bytes(),
            foreground: theme.foreground().color.to_bytes(),
            artwork,
            artist,
            title,
            playtime,
            palette: palette_strip,
            tracks,
            scan_code,
            label,
            release_date,
        })
    }

    /// Scan code whose bottom edge is at `bottom` and top edge not above `top`.
    ///
    /// Codes taller than the band are shrunk with their aspect ratio kept;
    /// `None` when not even a pixel row is left.
    fn place_scan_code(&self, code: &EncodedImage, top: f32, bottom: f32) -> Option<ImageElement> {
        let width = self.canvas.width as f32;
        let available = (bottom - top).floor();

        let mut code_width = (width * SCAN_CODE_WIDTH_SHARE).floor();
        let mut code_height = code.scaled_height(code_width).round();
        if code_height > available && code.height > 0 {
            code_height = available;
            code_width = (available * code.width as f32 / code.height as f32).floor();
            tracing::debug!(code_width, code_height, "Scan code shrunk to fit above the footer");
        }
        if code_width < 1.0 || code_height < 1.0 {
            tracing::warn!(available, "No room for the scan code, leaving it out");
            return None;
        }

        Some(ImageElement {
            href: code.data_uri(),
            x: round2((width - code_width) / 2.0),
            y: round2(bottom - code_height),
            width: code_width,
            height: code_height,
            radius: 0.0,
        })
    }

    /// Largest size up to `base` at which `text` fits `allotted`
    fn fit_size(&self, face: &FontFace, base: f32, allotted: f32, text: &str) -> f32 {
        let measured = self.metrics.advance(face, base, text);
        if measured > allotted {
            (base * allotted / measured).floor().max(1.0)
        } else {
            base
        }
    }

    /// Single text line whose top edge is at `top`; `None` for empty text
    fn text_line(
        &self,
        text: &str,
        face: &FontFace,
        size: f32,
        x: f32,
        top: f32,
        anchor: &'static str,
    ) -> Option<TextElement> {
        if text.is_empty() {
            return None;
        }
        Some(TextElement {
            text: text.to_string(),
            x,
            y: round2(top + self.metrics.ascent(face, size)),
            size,
            family: face.family.clone(),
            weight: face.weight,
            anchor,
        })
    }

    /// Track listing from `top` down; lines reaching below `limit` are dropped
    fn track_lines(&self, album: &AlbumData, size: f32, s: f32, top: f32, limit: f32) -> Vec<TextElement> {
        let face = &self.fonts.tracks;
        let options = LineOptions {
            separator: self.track_layout.separator.clone(),
            flush: self.track_layout.flush_policy(),
        };
        let max_width = self.canvas.width as f32 - 2.0 * s;
        let lines = layout_lines(&album.tracks, max_width, &options, |candidate| {
            self.metrics.advance(face, size, candidate)
        });

        let ascent = self.metrics.ascent(face, size);
        let line_height = self.metrics.line_height(face, size);
        let total = lines.len();

        let mut elements = Vec::with_capacity(total);
        let mut y = top;
        for line in lines {
            if y + line_height > limit {
                tracing::debug!(
                    drawn = elements.len(),
                    dropped = total - elements.len(),
                    "Track lines do not fit above the scan code"
                );
                break;
            }
            elements.push(TextElement {
                text: line,
                x: s,
                y: round2(y + ascent),
                size,
                family: face.family.clone(),
                weight: face.weight,
                anchor: "start",
            });
            y += line_height;
        }
        elements
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
