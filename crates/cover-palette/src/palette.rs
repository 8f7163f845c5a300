//! Dominant-color palettes
//!
//! Extraction clusters the artwork's pixels in CIE Lab with k-means
//! (`kmeans_colors`) and ranks the resulting centroids by how many pixels
//! they own. The seed is fixed, so the same artwork always yields the same
//! palette.

use kmeans_colors::get_kmeans;
use ::palette::{IntoColor, Lab, Srgb};

use crate::color::Color;
use crate::error::PaletteError;

/// Upper bound on requested clusters.
///
/// `kmeans_colors` stores cluster indices as `u8`; posters never need more
/// than a handful of swatches anyway.
pub const MAX_COLORS: usize = 32;

const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 1e-4;
const KMEANS_SEED: u64 = 0;

/// An ordered, non-empty list of colors, most dominant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from colors already ordered by dominance.
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Extract up to `max_colors` dominant colors from a pixel buffer.
    ///
    /// Clusters that end up with no pixels are dropped, so the result can be
    /// shorter than `max_colors` (e.g. for flat single-color artwork).
    pub fn extract(pixels: &[Color], max_colors: usize) -> Result<Self, PaletteError> {
        if max_colors == 0 || max_colors > MAX_COLORS {
            return Err(PaletteError::InvalidColorCount {
                requested: max_colors,
            });
        }
        if pixels.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        // Few distinct colors: count them exactly instead of clustering
        let distinct = count_distinct(pixels, max_colors);
        if let Some(mut counted) = distinct {
            counted.sort_by(|a, b| b.1.cmp(&a.1));
            return Self::new(counted.into_iter().map(|(color, _)| color).collect());
        }

        let lab_pixels: Vec<Lab> = pixels
            .iter()
            .map(|c| {
                Srgb::new(c.r, c.g, c.b)
                    .into_format::<f32>()
                    .into_color()
            })
            .collect();

        let kmeans = get_kmeans(
            max_colors,
            KMEANS_MAX_ITER,
            KMEANS_CONVERGE,
            false,
            &lab_pixels,
            KMEANS_SEED,
        );

        let mut counts = vec![0usize; kmeans.centroids.len()];
        for &idx in &kmeans.indices {
            if let Some(count) = counts.get_mut(idx as usize) {
                *count += 1;
            }
        }

        let mut ranked: Vec<(usize, Color)> = kmeans
            .centroids
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(&lab, count)| {
                let rgb: Srgb = lab.into_color();
                let rgb = rgb.into_format::<u8>();
                (count, Color::new(rgb.red, rgb.green, rgb.blue))
            })
            .collect();
        // Stable sort keeps centroid order for ties
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        Self::new(ranked.into_iter().map(|(_, color)| color).collect())
    }

    /// The most dominant color.
    pub fn primary(&self) -> Color {
        self.colors[0]
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

/// Count pixels per distinct color, in first-seen order.
///
/// Returns `None` as soon as more than `limit` distinct colors are seen.
fn count_distinct(pixels: &[Color], limit: usize) -> Option<Vec<(Color, usize)>> {
    let mut counted: Vec<(Color, usize)> = Vec::with_capacity(limit);
    for &pixel in pixels {
        if let Some(idx) = counted.iter().position(|(color, _)| *color == pixel) {
            counted[idx].1 += 1;
        } else if counted.len() < limit {
            counted.push((pixel, 1));
        } else {
            return None;
        }
    }
    Some(counted)
}
