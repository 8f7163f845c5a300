use base64::Engine;

/// An encoded raster or vector image ready to embed in the poster SVG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type, e.g. `image/png` or `image/svg+xml`
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Intrinsic size in pixels (for SVG, the viewBox size)
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// Decode just far enough to learn format and dimensions
    pub fn from_raster(bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let format = image::guess_format(&bytes)?;
        let (width, height) =
            image::ImageReader::with_format(std::io::Cursor::new(&bytes), format).into_dimensions()?;
        Ok(Self {
            mime: format.to_mime_type().to_string(),
            bytes,
            width,
            height,
        })
    }

    /// `data:` URI for an SVG `href`
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Height when scaled to `width`, keeping the aspect ratio
    pub fn scaled_height(&self, width: f32) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        width * self.height as f32 / self.width as f32
    }
}
