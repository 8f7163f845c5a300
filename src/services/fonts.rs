//! Text measurement against the renderer's font database
//!
//! Layout must measure with the same faces resvg will draw with, so the
//! library resolves faces through the shared `fontdb::Database` and reads
//! glyph metrics with ab_glyph.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};

use crate::error::RenderError;
use crate::models::FontFace;

/// Width used per character when a face cannot be loaded, in em
const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Font metrics in SVG user units, where `size` is the CSS font-size
pub trait TextMetrics {
    /// Make sure `face` resolves; called once per face before measuring
    fn prepare(&self, _face: &FontFace) -> Result<(), RenderError> {
        Ok(())
    }

    /// Horizontal advance of `text`, including kerning
    fn advance(&self, face: &FontFace, size: f32, text: &str) -> f32;

    /// Distance from the top of the line box to the baseline
    fn ascent(&self, face: &FontFace, size: f32) -> f32;

    /// Baseline-to-baseline distance
    fn line_height(&self, face: &FontFace, size: f32) -> f32;
}

pub struct FontLibrary {
    fontdb: Arc<fontdb::Database>,
    cache: RefCell<HashMap<FontFace, Option<Rc<FontVec>>>>,
}

impl FontLibrary {
    pub fn new(fontdb: Arc<fontdb::Database>) -> Self {
        Self {
            fontdb,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn load(&self, face: &FontFace) -> Option<Rc<FontVec>> {
        if let Some(cached) = self.cache.borrow().get(face) {
            return cached.clone();
        }

        let font = self.query(face).map(Rc::new);
        self.cache.borrow_mut().insert(face.clone(), font.clone());
        font
    }

    fn query(&self, face: &FontFace) -> Option<FontVec> {
        let families = [
            fontdb::Family::Name(&face.family),
            fontdb::Family::SansSerif,
        ];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(face.weight),
            ..Default::default()
        };
        let id = self.fontdb.query(&query)?;

        if let Some(info) = self.fontdb.face(id) {
            let resolved = info.families.first().map(|(name, _)| name.as_str());
            if resolved != Some(face.family.as_str()) {
                tracing::warn!(
                    requested = %face.family,
                    resolved = resolved.unwrap_or("?"),
                    "Font family not installed, using fallback"
                );
            }
        }

        self.fontdb
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            })
            .flatten()
    }

    /// ab_glyph scales by ascent-to-descent height; SVG font-size is the em
    fn px_scale(font: &FontVec, size: f32) -> PxScale {
        match font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
            _ => PxScale::from(size),
        }
    }
}

impl TextMetrics for FontLibrary {
    fn prepare(&self, face: &FontFace) -> Result<(), RenderError> {
        self.load(face).map(|_| ()).ok_or_else(|| RenderError::FontNotFound {
            family: face.family.clone(),
            weight: face.weight,
        })
    }

    fn advance(&self, face: &FontFace, size: f32, text: &str) -> f32 {
        let Some(font) = self.load(face) else {
            return text.chars().count() as f32 * size * FALLBACK_ADVANCE_EM;
        };
        let scaled = font.as_scaled(Self::px_scale(&font, size));

        let mut width = 0.0;
        let mut previous = None;
        for c in text.chars() {
            let glyph_id = font.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }
        width
    }

    fn ascent(&self, face: &FontFace, size: f32) -> f32 {
        match self.load(face) {
            Some(font) => font.as_scaled(Self::px_scale(&font, size)).ascent(),
            None => size * 0.8,
        }
    }

    fn line_height(&self, face: &FontFace, size: f32) -> f32 {
        match self.load(face) {
            Some(font) => {
                let scaled = font.as_scaled(Self::px_scale(&font, size));
                scaled.height() + scaled.line_gap()
            }
            None => size * 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_library() -> FontLibrary {
        FontLibrary::new(Arc::new(fontdb::Database::new()))
    }

    #[test]
    fn test_prepare_fails_without_fonts() {
        let library = empty_library();
        let face = FontFace::new("Noto Sans", 700);

        match library.prepare(&face) {
            Err(RenderError::FontNotFound { family, weight }) => {
                assert_eq!(family, "Noto Sans");
                assert_eq!(weight, 700);
            }
            other => panic!("expected FontNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_metrics_scale_with_size() {
        let library = empty_library();
        let face = FontFace::new("Missing", 400);

        let small = library.advance(&face, 10.0, "abcd");
        let large = library.advance(&face, 20.0, "abcd");
        assert!((large - 2.0 * small).abs() < 1e-4);
        assert!(library.ascent(&face, 100.0) < library.line_height(&face, 100.0));
        assert_eq!(library.advance(&face, 10.0, ""), 0.0);
    }

    #[test]
    fn test_failed_lookup_is_cached() {
        let library = empty_library();
        let face = FontFace::new("Missing", 400);
        let _ = library.prepare(&face);
        let _ = library.prepare(&face);
        assert_eq!(library.cache.borrow().len(), 1);
    }
}
