//! Album poster generator
//!
//! Renders printable posters from Spotify album, track or playlist links:
//! cover art, artist and title, a palette strip of the artwork's dominant
//! colors, the track list, a scannable code and release details.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod layout;
pub mod models;
pub mod rendering;
pub mod services;
