use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cover_palette::{Color, Palette, Theme};

use crate::assets::AssetLoader;
use crate::error::PosterError;
use crate::layout::normalize_tracks;
use crate::models::{sanitize_file_stem, AlbumData, AppConfig, EncodedImage};
use crate::rendering::SvgRenderer;
use crate::services::compositor::PosterCompositor;
use crate::services::fonts::{FontLibrary, TextMetrics};
use crate::services::scan_code::{provider_for, ScanCodeProvider};
use crate::services::spotify::{MetadataProvider, SpotifyClient};
use crate::services::template_service::TemplateService;

/// Longest edge of the artwork thumbnail used for color extraction
const PALETTE_THUMBNAIL_EDGE: u32 = 128;

/// File stem used when a title sanitizes to nothing
const FALLBACK_STEM: &str = "untitled";

/// Orchestrates link → metadata → artwork → palette → scene → SVG → PNG file
pub struct PosterPipeline {
    config: Arc<AppConfig>,
    metadata: Box<dyn MetadataProvider>,
    scan_codes: Box<dyn ScanCodeProvider>,
    templates: TemplateService,
    renderer: Arc<SvgRenderer>,
    metrics: Box<dyn TextMetrics>,
}

impl PosterPipeline {
    pub fn new(
        config: Arc<AppConfig>,
        metadata: Box<dyn MetadataProvider>,
        scan_codes: Box<dyn ScanCodeProvider>,
        templates: TemplateService,
        renderer: Arc<SvgRenderer>,
        metrics: Box<dyn TextMetrics>,
    ) -> Self {
        Self {
            config,
            metadata,
            scan_codes,
            templates,
            renderer,
            metrics,
        }
    }

    /// Wire up the Spotify client, scan-code provider, template and fonts
    pub fn from_config(config: Arc<AppConfig>, loader: &AssetLoader) -> Result<Self, PosterError> {
        let metadata = SpotifyClient::new(config.spotify.clone())?;
        let scan_codes = provider_for(config.scan_code, &config.spotify.scannables_base);
        let templates = TemplateService::new(loader)?;
        let renderer = Arc::new(SvgRenderer::with_fonts(loader.get_fonts()));
        let metrics = FontLibrary::new(renderer.fontdb());

        Ok(Self::new(
            config,
            Box::new(metadata),
            scan_codes,
            templates,
            renderer,
            Box::new(metrics),
        ))
    }

    /// Render every candidate background for `link` and return the written files
    pub fn generate(&self, link: &str) -> Result<Vec<PathBuf>, PosterError> {
        let canvas = self.config.canvas.validated()?;
        let album = self.load_album(link)?;

        let artwork_bytes = self.metadata.fetch_artwork(&album.artwork_url)?;
        let (artwork, palette) = self.analyze_artwork(artwork_bytes)?;

        let backgrounds = self.config.candidate_backgrounds(&palette);
        tracing::info!(
            title = %album.title.text,
            palette = ?palette.colors().iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            variants = backgrounds.len(),
            "Rendering poster"
        );

        let compositor = PosterCompositor::new(
            canvas,
            &self.config.fonts,
            &self.config.tracks,
            self.metrics.as_ref(),
        );

        let stem = match sanitize_file_stem(&album.title.text) {
            stem if stem.is_empty() => FALLBACK_STEM.to_string(),
            stem => stem,
        };
        fs::create_dir_all(&self.config.output_dir)?;

        // Numbered from the back of the candidate list: the last palette
        // color is variant 0 and white gets the highest index
        let multiple = backgrounds.len() > 1;
        let mut written = Vec::with_capacity(backgrounds.len());
        for (idx, background) in backgrounds.into_iter().rev().enumerate() {
            let file_name = if multiple {
                format!("{stem}-poster-{idx}.png")
            } else {
                format!("{stem}-poster.png")
            };
            let path = self.config.output_dir.join(file_name);

            self.render_variant(&compositor, &album, &artwork, &palette, background, &path)?;
            written.push(path);
        }

        Ok(written)
    }

    /// Resolve `link` and fetch its metadata, with track names cleaned up
    /// when featured-artist removal is on
    pub fn load_album(&self, link: &str) -> Result<AlbumData, PosterError> {
        let link = self.metadata.resolve(link)?;
        let mut album = self.metadata.lookup(&link)?;
        album.tracks = normalize_tracks(&album.tracks, self.config.remove_featured_artists);
        Ok(album)
    }

    fn render_variant(
        &self,
        compositor: &PosterCompositor<'_>,
        album: &AlbumData,
        artwork: &EncodedImage,
        palette: &Palette,
        background: Color,
        path: &Path,
    ) -> Result<(), PosterError> {
        let theme = Theme::from_background(background);
        let scan_code = self
            .scan_codes
            .fetch(&album.uri, &theme, self.config.canvas.width);

        let scene = compositor.compose(album, artwork, palette, &theme, scan_code.as_ref())?;
        let svg = self.templates.render(&scene)?;
        tracing::debug!(svg_len = svg.len(), background = %background, "Poster template rendered");

        let png = self
            .renderer
            .render_to_png(svg.as_bytes(), self.config.canvas, self.config.optimize_png)?;
        fs::write(path, &png)?;

        tracing::info!(
            path = %path.display(),
            background = %background,
            foreground = %theme.foreground().name,
            bytes = png.len(),
            "Wrote poster"
        );
        Ok(())
    }

    /// Decode artwork for embedding and extract its dominant colors
    fn analyze_artwork(&self, bytes: Vec<u8>) -> Result<(EncodedImage, Palette), PosterError> {
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| PosterError::Artwork(e.to_string()))?;
        let sample = if decoded.width() > PALETTE_THUMBNAIL_EDGE
            || decoded.height() > PALETTE_THUMBNAIL_EDGE
        {
            decoded.thumbnail(PALETTE_THUMBNAIL_EDGE, PALETTE_THUMBNAIL_EDGE)
        } else {
            decoded
        };
        let pixels: Vec<Color> = sample
            .to_rgb8()
            .pixels()
            .map(|p| Color::from_bytes(p.0))
            .collect();
        let palette = Palette::extract(&pixels, self.config.palette_size)?;

        let artwork = EncodedImage::from_raster(bytes).map_err(|e| PosterError::Artwork(e.to_string()))?;
        Ok((artwork, palette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::models::{
        AlbumLink, BackgroundMode, CanvasSpec, FontFace, LinkKind, Localized, SpotifyUri,
    };
    use crate::services::scan_code::NoScanCode;
    use crate::services::spotify::MetadataError;
    use image::{ImageFormat, RgbImage};
    use tempfile::TempDir;

    struct FakeMetadata {
        artwork: Vec<u8>,
        title: String,
    }

    impl MetadataProvider for FakeMetadata {
        fn lookup(&self, link: &AlbumLink) -> Result<AlbumData, MetadataError> {
            Ok(AlbumData {
                artist: Localized::detect("Artist"),
                title: Localized::detect(self.title.clone()),
                tracks: vec!["One".to_string(), "Two (feat. X)".to_string()],
                playtime: "7:00".to_string(),
                label: Localized::detect("Label"),
                release_date: "2019".to_string(),
                artwork_url: "http://artwork".to_string(),
                uri: SpotifyUri::new(LinkKind::Album, link.id.clone()),
            })
        }

        fn fetch_artwork(&self, _url: &str) -> Result<Vec<u8>, MetadataError> {
            Ok(self.artwork.clone())
        }
    }

    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn advance(&self, _face: &FontFace, size: f32, text: &str) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }

        fn ascent(&self, _face: &FontFace, size: f32) -> f32 {
            size * 0.8
        }

        fn line_height(&self, _face: &FontFace, size: f32) -> f32 {
            size * 1.2
        }
    }

    fn artwork_png() -> Vec<u8> {
        let img = RgbImage::from_fn(32, 32, |x, _| {
            if x < 24 {
                image::Rgb([200, 30, 10])
            } else {
                image::Rgb([20, 40, 160])
            }
        });
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn pipeline(config: AppConfig, artwork: Vec<u8>) -> PosterPipeline {
        PosterPipeline::new(
            Arc::new(config),
            Box::new(FakeMetadata {
                artwork,
                title: "Hello: World?".to_string(),
            }),
            Box::new(NoScanCode),
            TemplateService::new(&AssetLoader::new(None, None, None)).unwrap(),
            Arc::new(SvgRenderer::with_fonts(Vec::new())),
            Box::new(FixedMetrics),
        )
    }

    fn config(dir: &TempDir, background: BackgroundMode) -> AppConfig {
        AppConfig {
            background,
            canvas: CanvasSpec::new(270, 427).unwrap(),
            output_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_single_variant_file_name() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::Dominant), artwork_png());

        let written = pipeline
            .generate("https://open.spotify.com/album/abc123")
            .unwrap();

        assert_eq!(written, vec![dir.path().join("Hello__World_-poster.png")]);
        assert!(written[0].exists());
    }

    #[test]
    fn test_all_backgrounds_write_numbered_files() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::All), artwork_png());

        let written = pipeline.generate("spotify:album:abc123").unwrap();

        // white, near-black, and the two artwork colors
        assert_eq!(written.len(), 4);
        for (idx, path) in written.iter().enumerate() {
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                format!("Hello__World_-poster-{idx}.png")
            );
            assert!(path.exists());
        }
    }

    #[test]
    fn test_variants_numbered_from_last_candidate() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::All), artwork_png());

        let written = pipeline.generate("spotify:album:abc123").unwrap();

        // Files come back in write order: last palette color first, white last
        let white = image::open(&written[3]).unwrap().to_rgb8();
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255]);
        let near_black = image::open(&written[2]).unwrap().to_rgb8();
        assert_eq!(near_black.get_pixel(0, 0).0, [10, 10, 10]);
    }

    #[test]
    fn test_featured_artists_removed_before_layout() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir, BackgroundMode::Dominant);
        config.remove_featured_artists = true;
        let pipeline = pipeline(config, artwork_png());

        let album = pipeline.load_album("spotify:album:abc123").unwrap();
        assert_eq!(album.tracks, vec!["One", "Two"]);

        let compositor = PosterCompositor::new(
            pipeline.config.canvas,
            &pipeline.config.fonts,
            &pipeline.config.tracks,
            &FixedMetrics,
        );
        let (artwork, palette) = pipeline.analyze_artwork(artwork_png()).unwrap();
        let theme = Theme::from_background(palette.primary());
        let scene = compositor
            .compose(&album, &artwork, &palette, &theme, None)
            .unwrap();
        let drawn: Vec<&str> = scene.tracks.iter().map(|t| t.text.as_str()).collect();
        assert!(drawn.iter().all(|line| !line.contains("feat.")));
        assert!(drawn.concat().contains("Two"));
    }

    #[test]
    fn test_featured_artists_kept_by_default() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::Dominant), artwork_png());

        let album = pipeline.load_album("spotify:album:abc123").unwrap();
        assert_eq!(album.tracks, vec!["One", "Two (feat. X)"]);
    }

    #[test]
    fn test_title_with_slash_stays_in_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut config = config(&dir, BackgroundMode::Dominant);
        config.output_dir = out.clone();
        let pipeline = PosterPipeline::new(
            Arc::new(config),
            Box::new(FakeMetadata {
                artwork: artwork_png(),
                title: "../Back In Black / Live".to_string(),
            }),
            Box::new(NoScanCode),
            TemplateService::new(&AssetLoader::new(None, None, None)).unwrap(),
            Arc::new(SvgRenderer::with_fonts(Vec::new())),
            Box::new(FixedMetrics),
        );

        let written = pipeline.generate("spotify:album:abc123").unwrap();

        assert_eq!(written, vec![out.join(".._Back_In_Black___Live-poster.png")]);
        assert!(written[0].exists());
        let siblings: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(siblings, vec![std::ffi::OsString::from("out")]);
    }

    #[test]
    fn test_invalid_link_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::Dominant), artwork_png());

        let result = pipeline.generate("https://example.com/album/abc");

        assert!(matches!(result, Err(PosterError::Link(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_corrupt_artwork() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(config(&dir, BackgroundMode::Dominant), b"garbage".to_vec());

        let result = pipeline.generate("spotify:album:abc123");
        assert!(matches!(result, Err(PosterError::Artwork(_))));
    }

    #[test]
    fn test_invalid_canvas() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir, BackgroundMode::Dominant);
        config.canvas = CanvasSpec {
            width: 0,
            height: 0,
        };
        let pipeline = pipeline(config, artwork_png());

        let result = pipeline.generate("spotify:album:abc123");
        assert!(matches!(
            result,
            Err(PosterError::Render(RenderError::UnsupportedDimensions { .. }))
        ));
    }
}
