use crate::assets::AssetLoader;
use crate::layout::FlushPolicy;
use crate::models::CanvasSpec;
use cover_palette::{all_candidates, Color, Palette};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Theme used when `background: theme`
    #[serde(default)]
    pub theme: ThemeName,

    /// Which backgrounds to render
    #[serde(default)]
    pub background: BackgroundMode,

    /// Strip `(feat. ...)` and `[...]` from track names
    #[serde(default)]
    pub remove_featured_artists: bool,

    #[serde(default)]
    pub canvas: CanvasSpec,

    #[serde(default)]
    pub tracks: TrackLayoutConfig,

    /// Number of dominant colors extracted from the artwork
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    #[serde(default)]
    pub scan_code: ScanCodeKind,

    /// Re-compress output PNGs with oxipng (slow on large canvases)
    #[serde(default)]
    pub optimize_png: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub fonts: FontsConfig,

    #[serde(default)]
    pub spotify: SpotifyConfig,
}

fn default_palette_size() -> usize {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
}

/// Background selection for a render
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// The artwork's most dominant color
    #[default]
    Dominant,
    /// White for the light theme, near-black for the dark theme
    Theme,
    /// One poster per candidate: white, near-black, then palette colors
    All,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanCodeKind {
    /// Spotify Code fetched from the scannables service
    #[default]
    Spotify,
    /// Locally generated QR code of the web link
    Qr,
    None,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlushMode {
    /// Always draw the trailing partial line
    Always,
    /// Drop the trailing partial line once `max_lines` full lines were drawn
    #[default]
    Capped,
}

/// Track list layout options
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TrackLayoutConfig {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub flush: FlushMode,

    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_max_lines() -> usize {
    4
}

impl Default for TrackLayoutConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            flush: FlushMode::default(),
            max_lines: default_max_lines(),
        }
    }
}

impl TrackLayoutConfig {
    pub fn flush_policy(&self) -> FlushPolicy {
        match self.flush {
            FlushMode::Always => FlushPolicy::Always,
            FlushMode::Capped => FlushPolicy::UnderLineCap(self.max_lines),
        }
    }
}

/// A font family plus CSS weight (100 = thin, 700 = bold)
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct FontFace {
    pub family: String,
    #[serde(default = "default_weight")]
    pub weight: u16,
}

fn default_weight() -> u16 {
    400
}

impl FontFace {
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }
}

/// Weight keyword requested by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Bold,
    Thin,
}

/// Per-language bold/thin faces
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageFonts {
    pub bold: FontFace,
    pub thin: FontFace,
}

/// Font-by-language table. Read-only once loaded.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FontsConfig {
    #[serde(default = "default_language_fonts")]
    pub default: LanguageFonts,

    /// Overrides keyed by language tag (`ja`, `ko`, `zh`, ...)
    #[serde(default = "default_languages")]
    pub languages: HashMap<String, LanguageFonts>,

    /// Playtime digits
    #[serde(default = "default_monospace")]
    pub monospace: FontFace,

    /// Track listing (mixed languages, so one wide-coverage face)
    #[serde(default = "default_tracks_face")]
    pub tracks: FontFace,
}

fn default_language_fonts() -> LanguageFonts {
    LanguageFonts {
        bold: FontFace::new("Noto Sans", 700),
        thin: FontFace::new("Noto Sans", 100),
    }
}

fn default_languages() -> HashMap<String, LanguageFonts> {
    let cjk = |family: &str| LanguageFonts {
        bold: FontFace::new(family, 700),
        thin: FontFace::new(family, 100),
    };
    HashMap::from([
        ("ja".to_string(), cjk("Noto Sans JP")),
        ("ko".to_string(), cjk("Noto Sans KR")),
        ("zh".to_string(), cjk("Noto Sans SC")),
    ])
}

fn default_monospace() -> FontFace {
    FontFace::new("Source Code Pro", 300)
}

fn default_tracks_face() -> FontFace {
    FontFace::new("Noto Sans JP", 100)
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            default: default_language_fonts(),
            languages: default_languages(),
            monospace: default_monospace(),
            tracks: default_tracks_face(),
        }
    }
}

impl FontsConfig {
    /// Face for text in `lang`, falling back to the default table
    pub fn face_for(&self, lang: &str, style: FontStyle) -> &FontFace {
        let fonts = self.languages.get(lang).unwrap_or(&self.default);
        match style {
            FontStyle::Bold => &fonts.bold,
            FontStyle::Thin => &fonts.thin,
        }
    }
}

/// Spotify API access. Credentials fall back to `SPOTIFY_CLIENT_ID` and
/// `SPOTIFY_CLIENT_SECRET`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_accounts_base")]
    pub accounts_base: String,

    #[serde(default = "default_scannables_base")]
    pub scannables_base: String,
}

fn default_api_base() -> String {
    "https://api.spotify.com".to_string()
}

fn default_accounts_base() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_scannables_base() -> String {
    "https://scannables.scdn.co".to_string()
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_api_base(),
            accounts_base: default_accounts_base(),
            scannables_base: default_scannables_base(),
        }
    }
}

impl SpotifyConfig {
    /// Resolve credentials from config, then environment
    pub fn credentials(&self) -> Option<(String, String)> {
        let id = self
            .client_id
            .clone()
            .or_else(|| std::env::var("SPOTIFY_CLIENT_ID").ok())?;
        let secret = self
            .client_secret
            .clone()
            .or_else(|| std::env::var("SPOTIFY_CLIENT_SECRET").ok())?;
        Some((id, secret))
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        background = ?config.background,
                        scan_code = ?config.scan_code,
                        width = config.canvas.width,
                        height = config.canvas.height,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Backgrounds to render for this artwork palette, in output order
    pub fn candidate_backgrounds(&self, palette: &Palette) -> Vec<Color> {
        match self.background {
            BackgroundMode::Dominant => vec![palette.primary()],
            BackgroundMode::Theme => match self.theme {
                ThemeName::Light => vec![Color::WHITE],
                ThemeName::Dark => vec![Color::NEAR_BLACK],
            },
            BackgroundMode::All => all_candidates(palette),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            background: BackgroundMode::default(),
            remove_featured_artists: false,
            canvas: CanvasSpec::default(),
            tracks: TrackLayoutConfig::default(),
            palette_size: default_palette_size(),
            scan_code: ScanCodeKind::default(),
            optimize_png: false,
            output_dir: default_output_dir(),
            fonts: FontsConfig::default(),
            spotify: SpotifyConfig::default(),
        }
    }
}
