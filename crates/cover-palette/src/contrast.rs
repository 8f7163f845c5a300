//! Contrast-aware foreground selection
//!
//! Picks black or white text for a background using WCAG relative luminance.
//!
//! The decision compares `(L + 0.05) / 0.05` against `1.05 / (L + 0.05)`,
//! i.e. the contrast of the background against black versus against white.
//! Note the linearization threshold is the WCAG 2.0 value `0.03928`, not the
//! IEC 61966-2-1 value `0.04045`. Both are kept exactly as-is: posters rendered
//! by earlier versions must pick the same text color for the same background.

use std::fmt;

use crate::color::Color;

/// Linearization threshold from the WCAG 2.0 relative luminance definition.
const LINEAR_THRESHOLD: f64 = 0.03928;

/// Text color classification, also used as the keyword for scannable codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForegroundName {
    Black,
    White,
}

impl ForegroundName {
    pub fn as_str(self) -> &'static str {
        match self {
            ForegroundName::Black => "black",
            ForegroundName::White => "white",
        }
    }
}

impl fmt::Display for ForegroundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreground color together with its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Foreground {
    pub color: Color,
    pub name: ForegroundName,
}

impl Foreground {
    pub const BLACK: Self = Self {
        color: Color::BLACK,
        name: ForegroundName::Black,
    };

    pub const WHITE: Self = Self {
        color: Color::WHITE,
        name: ForegroundName::White,
    };
}

/// Linearize one 8-bit sRGB channel.
fn channel_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= LINEAR_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in 0.0..=1.0.
pub fn relative_luminance(color: Color) -> f64 {
    0.2126 * channel_to_linear(color.r)
        + 0.7152 * channel_to_linear(color.g)
        + 0.0722 * channel_to_linear(color.b)
}

/// Choose black or white text for the given background.
///
/// Total over all colors: every background maps to exactly one of
/// [`Foreground::BLACK`] or [`Foreground::WHITE`].
pub fn select_foreground(background: Color) -> Foreground {
    let luminance = relative_luminance(background);
    if (luminance + 0.05) / 0.05 > 1.05 / (luminance + 0.05) {
        Foreground::BLACK
    } else {
        Foreground::WHITE
    }
}
