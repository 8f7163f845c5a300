//! Poster themes and candidate backgrounds

use crate::color::Color;
use crate::contrast::{select_foreground, Foreground};
use crate::palette::Palette;

/// Number of palette colors appended to the fixed candidates in
/// [`all_candidates`].
pub const PALETTE_CANDIDATES: usize = 5;

/// A background with the foreground computed for it.
///
/// The foreground is never chosen independently; construct through
/// [`Theme::from_background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Theme {
    background: Color,
    foreground: Foreground,
}

impl Theme {
    pub fn from_background(background: Color) -> Self {
        Self {
            background,
            foreground: select_foreground(background),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn foreground(&self) -> Foreground {
        self.foreground
    }
}

/// Every background the multi-variant mode renders, in order:
/// white, near-black, then up to [`PALETTE_CANDIDATES`] palette colors.
///
/// Entries are kept by position only; a palette color equal to white is
/// still rendered twice.
pub fn all_candidates(palette: &Palette) -> Vec<Color> {
    let mut candidates = vec![Color::WHITE, Color::NEAR_BLACK];
    candidates.extend(palette.iter().take(PALETTE_CANDIDATES).copied());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::ForegroundName;

    #[test]
    fn test_theme_pairs_background_with_contrast_foreground() {
        let light = Theme::from_background(Color::WHITE);
        assert_eq!(light.background(), Color::WHITE);
        assert_eq!(light.foreground().name, ForegroundName::Black);

        let dark = Theme::from_background(Color::NEAR_BLACK);
        assert_eq!(dark.foreground().name, ForegroundName::White);
    }

    #[test]
    fn test_all_candidates_caps_palette_entries() {
        let colors: Vec<Color> = (0..6u8).map(|i| Color::new(i * 40, 0, 0)).collect();
        let palette = Palette::new(colors.clone()).unwrap();
        let candidates = all_candidates(&palette);
        assert_eq!(candidates.len(), 2 + PALETTE_CANDIDATES);
        assert_eq!(candidates[0], Color::WHITE);
        assert_eq!(candidates[1], Color::NEAR_BLACK);
        assert_eq!(&candidates[2..], &colors[..5]);
    }

    #[test]
    fn test_all_candidates_keeps_positional_duplicates() {
        let palette = Palette::new(vec![Color::WHITE, Color::NEAR_BLACK]).unwrap();
        let candidates = all_candidates(&palette);
        assert_eq!(
            candidates,
            vec![Color::WHITE, Color::NEAR_BLACK, Color::WHITE, Color::NEAR_BLACK]
        );
    }
}
