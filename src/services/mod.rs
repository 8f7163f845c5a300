pub mod compositor;
pub mod fonts;
pub mod poster_pipeline;
pub mod scan_code;
pub mod spotify;
pub mod template_service;

pub use compositor::{PosterCompositor, PosterScene};
pub use fonts::{FontLibrary, TextMetrics};
pub use poster_pipeline::PosterPipeline;
pub use scan_code::{provider_for, NoScanCode, QrScanCode, ScanCode, ScanCodeProvider, SpotifyScannables};
pub use spotify::{MetadataError, MetadataProvider, SpotifyClient};
pub use template_service::{TemplateError, TemplateService};
