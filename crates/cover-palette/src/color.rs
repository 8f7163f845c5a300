//! 8-bit sRGB color type
//!
//! Every channel is a `u8`, so the 0..=255 range invariant is carried by the
//! type itself. Colors parse from and format to `#rrggbb` hex strings.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

type RgbTuple = (u8, u8, u8);

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Pure white (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Near-black (10, 10, 10) used for the dark poster background.
    ///
    /// Slightly lifted from pure black so the printed background does not
    /// read as a flat ink block.
    pub const NEAR_BLACK: Self = Self::new(10, 10, 10);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Lowercase hex without the leading `#` (e.g. `"0a0a0a"`).
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS/SVG hex notation (e.g. `"#0a0a0a"`).
    pub fn to_css(self) -> String {
        format!("#{}", self.to_hex())
    }
}

impl From<RgbTuple> for Color {
    fn from(rgb: RgbTuple) -> Self {
        Self::new(rgb.0, rgb.1, rgb.2)
    }
}

impl From<Color> for RgbTuple {
    fn from(color: Color) -> Self {
        (color.r, color.g, color.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color from `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    ///
    /// Parsing is case-insensitive. Leading and trailing whitespace is trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
