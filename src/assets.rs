//! Asset loading with embedded fallbacks
//!
//! The poster template and the default config are compiled into the binary.
//! Setting `TEMPLATES_DIR` or `CONFIG_FILE` points the loader at files on disk,
//! which win over the embedded copies when present. Fonts are never embedded:
//! `FONTS_DIR` adds font files on top of the system fonts.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the poster template inside the templates directory
pub const POSTER_TEMPLATE: &str = "poster.svg";

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.svg"]
struct EmbeddedTemplates;

#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Templates,
    Config,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External templates directory (from TEMPLATES_DIR env var)
    templates_dir: Option<PathBuf>,
    /// External fonts directory (from FONTS_DIR env var)
    fonts_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var or `--config`)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Paths should be `Some` only if the corresponding env var or flag was set.
    pub fn new(
        templates_dir: Option<PathBuf>,
        fonts_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> Self {
        Self {
            templates_dir,
            fonts_dir,
            config_file,
        }
    }

    /// Loader configured from `TEMPLATES_DIR`, `FONTS_DIR` and `CONFIG_FILE`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
            std::env::var("FONTS_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    /// Replace the config path (the `--config` flag beats `CONFIG_FILE`)
    pub fn with_config_file(mut self, config_file: Option<PathBuf>) -> Self {
        if config_file.is_some() {
            self.config_file = config_file;
        }
        self
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Read a template, preferring the external directory
    pub fn read_template(&self, name: &str) -> io::Result<String> {
        if let Some(ref dir) = self.templates_dir {
            let full_path = dir.join(name);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading template from filesystem");
                return fs::read_to_string(&full_path);
            }
        }

        let data = EmbeddedTemplates::get(name)
            .map(|f| {
                tracing::trace!(template = name, "Loading template from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("Template not found: {name}"))
            })?;
        String::from_utf8(data.into_owned()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Font files from `FONTS_DIR`, for loading into fontdb
    pub fn get_fonts(&self) -> Vec<(String, Vec<u8>)> {
        let mut fonts = Vec::new();
        let Some(ref dir) = self.fonts_dir else {
            return fonts;
        };

        let Ok(entries) = fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "Cannot read fonts directory");
            return fonts;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "ttf" | "otf" | "ttc"));
            if !is_font {
                continue;
            }
            match fs::read(&path) {
                Ok(data) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    tracing::trace!(font = %name, "Loading font from filesystem");
                    fonts.push((name, data));
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable font"),
            }
        }

        fonts.sort_by(|a, b| a.0.cmp(&b.0));
        fonts
    }

    /// Read the config file, falling back to the embedded default
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(path = %path.display(), "Config file not found, using embedded default");
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| f.data)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found"))
    }

    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract embedded assets to the filesystem (init command)
    ///
    /// Uses the configured paths, or `./templates` and `./config.yaml`.
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Templates => {
                    let dir = self
                        .templates_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./templates"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedTemplates::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedTemplates::get(&file) {
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            fs::create_dir_all(parent)?;
                        }
                    }
                    if let Some(data) = EmbeddedConfig::get("config.yaml") {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Templates => EmbeddedTemplates::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}
