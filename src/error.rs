use thiserror::Error;

use crate::models::LinkError;
use crate::services::spotify::MetadataError;
use crate::services::template_service::TemplateError;

/// Failure of one poster run (one input link)
#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Artwork error: {0}")]
    Artwork(String),

    #[error("Palette error: {0}")]
    Palette(#[from] cover_palette::PaletteError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Font not found: {family} (weight {weight})")]
    FontNotFound { family: String, weight: u16 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
