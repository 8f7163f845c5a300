pub mod album;
pub mod canvas_spec;
pub mod config;
pub mod encoded_image;
pub mod link;

pub use album::{detect_language, sanitize_file_stem, AlbumData, Localized};
pub use canvas_spec::CanvasSpec;
pub use config::{
    AppConfig, BackgroundMode, FlushMode, FontFace, FontStyle, FontsConfig, LanguageFonts,
    ScanCodeKind, SpotifyConfig, ThemeName, TrackLayoutConfig,
};
pub use encoded_image::EncodedImage;
pub use link::{AlbumLink, LinkError, LinkKind, SpotifyUri};
