use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use album_poster::assets::{AssetCategory, AssetLoader};
use album_poster::models::{AppConfig, BackgroundMode, ScanCodeKind, ThemeName};
use album_poster::rendering::SvgRenderer;
use album_poster::services::PosterPipeline;

#[derive(Parser)]
#[command(name = "album-poster")]
#[command(about = "Render printable album posters from Spotify links")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render posters for one or more album, track or playlist links
    Render {
        /// Spotify links (open.spotify.com, spotify: URIs or spotify.link short links)
        #[arg(required = true)]
        links: Vec<String>,

        /// Config file (overrides CONFIG_FILE)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the PNG files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Theme used with `--background theme`
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Which backgrounds to render
        #[arg(short, long, value_enum)]
        background: Option<BackgroundArg>,

        /// Strip "(feat. ...)" and "[...]" from track names
        #[arg(long)]
        remove_featured_artists: bool,

        /// Scannable code under the track list
        #[arg(long, value_enum)]
        scan_code: Option<ScanCodeArg>,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the poster template
        #[arg(long)]
        template: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
    /// List font families available for rendering
    Fonts,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackgroundArg {
    Dominant,
    Theme,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScanCodeArg {
    Spotify,
    Qr,
    None,
}

/// Command-line values that win over the config file
struct RenderOverrides {
    output_dir: Option<PathBuf>,
    theme: Option<ThemeArg>,
    background: Option<BackgroundArg>,
    remove_featured_artists: bool,
    scan_code: Option<ScanCodeArg>,
}

impl RenderOverrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(theme) = self.theme {
            config.theme = match theme {
                ThemeArg::Light => ThemeName::Light,
                ThemeArg::Dark => ThemeName::Dark,
            };
        }
        if let Some(background) = self.background {
            config.background = match background {
                BackgroundArg::Dominant => BackgroundMode::Dominant,
                BackgroundArg::Theme => BackgroundMode::Theme,
                BackgroundArg::All => BackgroundMode::All,
            };
        }
        if self.remove_featured_artists {
            config.remove_featured_artists = true;
        }
        if let Some(scan_code) = self.scan_code {
            config.scan_code = match scan_code {
                ScanCodeArg::Spotify => ScanCodeKind::Spotify,
                ScanCodeArg::Qr => ScanCodeKind::Qr,
                ScanCodeArg::None => ScanCodeKind::None,
            };
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            links,
            config,
            output_dir,
            theme,
            background,
            remove_featured_artists,
            scan_code,
        }) => run_render_command(
            &links,
            config,
            RenderOverrides {
                output_dir,
                theme,
                background,
                remove_featured_artists,
                scan_code,
            },
        ),
        Some(Commands::Init {
            template,
            config,
            all,
            force,
            list,
        }) => run_init_command(template, config, all, force, list),
        Some(Commands::Fonts) => {
            run_fonts_command();
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "album_poster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Render every link; a failed link is reported and the rest still run
fn run_render_command(
    links: &[String],
    config_file: Option<PathBuf>,
    overrides: RenderOverrides,
) -> anyhow::Result<()> {
    init_logging();

    let loader = AssetLoader::from_env().with_config_file(config_file);
    let mut config = AppConfig::load_from_assets(&loader);
    overrides.apply(&mut config);

    let pipeline = PosterPipeline::from_config(Arc::new(config), &loader)?;

    let mut failed = 0;
    for link in links {
        match pipeline.generate(link) {
            Ok(paths) => {
                for path in paths {
                    println!("{}", path.display());
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!(link = %link, error = %e, "Failed to render poster");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} links failed", links.len());
    }
    Ok(())
}

fn run_init_command(
    template: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Templates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || template {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --template, or --config");
        eprintln!("\nRun 'album-poster init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

fn run_fonts_command() {
    let loader = AssetLoader::from_env();
    let renderer = SvgRenderer::with_fonts(loader.get_fonts());
    for family in renderer.font_families() {
        println!("{family}");
    }
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let loader = AssetLoader::from_env();
    let has_client_id = std::env::var("SPOTIFY_CLIENT_ID").is_ok();
    let has_client_secret = std::env::var("SPOTIFY_CLIENT_SECRET").is_ok();

    println!("album-poster v{VERSION}");
    println!("Printable album posters from Spotify links\n");

    let shown = |path: Option<&Path>| {
        path.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
    };
    println!("Environment Variables:");
    println!("  CONFIG_FILE           = {}", shown(loader.config_file()));
    println!("  TEMPLATES_DIR         = {}", shown(loader.templates_dir()));
    println!("  FONTS_DIR             = {}", shown(loader.fonts_dir()));
    println!(
        "  SPOTIFY_CLIENT_ID     = {}",
        if has_client_id { "(set)" } else { "(not set)" }
    );
    println!(
        "  SPOTIFY_CLIENT_SECRET = {}",
        if has_client_secret { "(set)" } else { "(not set)" }
    );

    println!("\nAsset Sources:");

    let source = |path: Option<&Path>, kind: &str| match path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(_) => format!("embedded ({kind} not found)"),
        None => "embedded".to_string(),
    };
    println!("  Config:   {}", source(loader.config_file(), "file"));
    println!("  Template: {}", source(loader.templates_dir(), "directory"));

    match loader.fonts_dir() {
        Some(path) => println!(
            "  Fonts:    {} ({} files) + system fonts",
            path.display(),
            loader.get_fonts().len()
        ),
        None => println!("  Fonts:    system fonts"),
    }

    println!("\nCommands:");
    println!("  album-poster render <LINK>...   Render posters");
    println!("  album-poster init --all         Extract template and config for customization");
    println!("  album-poster fonts              List available font families");
    println!("  album-poster --help             Show all options");
}
