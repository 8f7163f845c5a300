use crate::error::RenderError;
use crate::models::CanvasSpec;
use resvg::usvg::{self, Transform};
use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes poster SVG into full-color PNG.
///
/// The font database is built once and shared with the text measurer so that
/// layout and rendering resolve the same faces.
pub struct SvgRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a renderer with the given font files plus system fonts
    pub fn with_fonts(fonts: Vec<(String, Vec<u8>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data);
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// System fonts only
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Shared handle to the font database
    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.fontdb)
    }

    /// Sorted, deduplicated family names known to the renderer
    pub fn font_families(&self) -> Vec<String> {
        self.fontdb
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Render SVG to an RGBA PNG of exactly the canvas size.
    ///
    /// With `optimize` set the PNG is re-compressed by oxipng; if that fails
    /// the plain encoding is returned.
    pub fn render_to_png(
        &self,
        svg_data: &[u8],
        canvas: CanvasSpec,
        optimize: bool,
    ) -> Result<Vec<u8>, RenderError> {
        let canvas = canvas.validated()?;
        let pixmap = self.rasterize_svg(svg_data, canvas)?;

        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let compression = if optimize {
            png::Compression::Fast
        } else {
            png::Compression::Default
        };
        let png_bytes = encode_png(canvas, compression, &rgba)?;

        if !optimize {
            return Ok(png_bytes);
        }

        match oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..Default::default()
            },
        ) {
            Ok(optimized) => {
                tracing::debug!(
                    before = png_bytes.len(),
                    after = optimized.len(),
                    "Optimized PNG"
                );
                Ok(optimized)
            }
            Err(e) => {
                tracing::warn!(error = %e, "PNG optimization failed, keeping plain encoding");
                Ok(png_bytes)
            }
        }
    }

    /// Parse and rasterize SVG to an RGBA pixmap, scaled to fit the canvas
    fn rasterize_svg(&self, svg_data: &[u8], canvas: CanvasSpec) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = canvas.width as f32 / svg_size.width();
        let scale_y = canvas.height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let offset_x = (canvas.width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (canvas.height as f32 - svg_size.height() * scale) / 2.0;

        let mut pixmap =
            Pixmap::new(canvas.width, canvas.height).ok_or(RenderError::PixmapAllocation)?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode 8-bit RGBA rows as PNG
fn encode_png(
    canvas: CanvasSpec,
    compression: png::Compression,
    rgba: &[u8],
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, canvas.width, canvas.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
