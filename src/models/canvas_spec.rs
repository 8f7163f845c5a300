use crate::error::RenderError;
use serde::Deserialize;

/// Largest edge accepted for a poster canvas
const MAX_EDGE: u32 = 16_384;

/// Poster canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    /// Credit-card proportions (54 x 85.4) at 50 px per unit, roughly 300 DPI
    pub const DEFAULT: Self = Self {
        width: 2700,
        height: 4270,
    };

    /// Validate dimensions
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        match (width, height) {
            (0, _) | (_, 0) => Err(RenderError::UnsupportedDimensions { width, height }),
            (w, h) if w > MAX_EDGE || h > MAX_EDGE => {
                Err(RenderError::UnsupportedDimensions { width, height })
            }
            (w, h) => Ok(Self {
                width: w,
                height: h,
            }),
        }
    }

    /// Re-check a spec that came from deserialization
    pub fn validated(self) -> Result<Self, RenderError> {
        Self::new(self.width, self.height)
    }

    /// Base margin unit: 3% of the canvas width
    pub fn spacing(&self) -> f32 {
        (self.width as f32 * 0.03).floor()
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_credit_card_ratio() {
        let spec = CanvasSpec::default();
        assert_eq!(spec.width, 2700);
        assert_eq!(spec.height, 4270);
        assert_eq!(spec.spacing(), 81.0);
    }

    #[test]
    fn test_rejects_zero_and_oversized() {
        assert!(matches!(
            CanvasSpec::new(0, 100),
            Err(RenderError::UnsupportedDimensions { width: 0, height: 100 })
        ));
        assert!(CanvasSpec::new(100, 0).is_err());
        assert!(CanvasSpec::new(MAX_EDGE + 1, 100).is_err());
        assert_eq!(CanvasSpec::new(270, 427).unwrap().width, 270);
    }
}
