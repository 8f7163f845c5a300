//! Test fixtures: API payloads, images and fake font metrics.

use album_poster::models::FontFace;
use album_poster::services::TextMetrics;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};

pub const ALBUM_ID: &str = "4aawyAB9vmqN3uQ7FjRGTy";
pub const TRACK_ID: &str = "11dFghVXANMlKmJXsNCbNl";
pub const PLAYLIST_ID: &str = "37i9dQZF1DXcBWIGoYBM5M";
pub const ACCESS_TOKEN: &str = "test-token";

/// Dominant red, with a blue stripe on the right quarter
pub fn artwork_png() -> Vec<u8> {
    let img = RgbImage::from_fn(64, 64, |x, _| {
        if x < 48 {
            Rgb([200, 30, 10])
        } else {
            Rgb([20, 40, 160])
        }
    });
    encode_png(&img)
}

/// Wide, short image shaped like a Spotify Code
pub fn scan_code_png() -> Vec<u8> {
    let img = RgbImage::from_pixel(640, 160, Rgb([10, 10, 10]));
    encode_png(&img)
}

fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

/// Album payload with the first page of tracks; `next` points at page two
pub fn album_json(base_url: &str) -> Value {
    json!({
        "id": ALBUM_ID,
        "name": "Global Warming: Live?",
        "artists": [{"name": "Pitbull"}, {"name": "Ne-Yo"}],
        "images": [
            {"url": format!("{base_url}/artwork/cover.png"), "width": 640, "height": 640},
            {"url": format!("{base_url}/artwork/small.png"), "width": 64, "height": 64}
        ],
        "label": "Mr.305/Polo Grounds Music/RCA Records",
        "release_date": "2012-11-16",
        "release_date_precision": "day",
        "tracks": {
            "items": [
                {"name": "Global Warming", "duration_ms": 85000},
                {"name": "Don't Stop the Party (feat. TJR)", "duration_ms": 206000}
            ],
            "next": format!("{base_url}/v1/albums/{ALBUM_ID}/tracks?offset=2&limit=2")
        }
    })
}

pub fn album_tracks_page_two() -> Value {
    json!({
        "items": [
            {"name": "Feel This Moment [feat. Christina Aguilera]", "duration_ms": 229000}
        ],
        "next": null
    })
}

pub fn track_json() -> Value {
    json!({
        "id": TRACK_ID,
        "name": "Global Warming",
        "album": {"id": ALBUM_ID, "name": "Global Warming: Live?"}
    })
}

pub fn playlist_json(base_url: &str) -> Value {
    json!({
        "id": PLAYLIST_ID,
        "name": "Today's Top Hits",
        "owner": {"id": "spotify", "display_name": "Spotify"},
        "images": [{"url": format!("{base_url}/artwork/cover.png")}],
        "tracks": {
            "items": [
                {"track": {"name": "Song A", "duration_ms": 60000}},
                {"track": null},
                {"track": {"name": "Song B", "duration_ms": 61000}}
            ],
            "next": null
        }
    })
}

/// Every glyph is half an em wide; no fonts needed
pub struct FixedMetrics;

impl TextMetrics for FixedMetrics {
    fn advance(&self, _face: &FontFace, size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn ascent(&self, _face: &FontFace, size: f32) -> f32 {
        size * 0.8
    }

    fn line_height(&self, _face: &FontFace, size: f32) -> f32 {
        size * 1.2
    }
}
