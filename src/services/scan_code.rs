//! Scannable codes printed under the track list
//!
//! Failures never abort a poster: providers log a warning and return `None`,
//! and the compositor leaves the code out.

use std::fmt::Write as _;
use std::time::Duration;

use cover_palette::Theme;
use fast_qr::ECL;
use reqwest::blocking::Client;

use crate::models::{EncodedImage, ScanCodeKind, SpotifyUri};

/// Scannables service accepts widths in this range
const MIN_SCANNABLE_SIZE: u32 = 256;
const MAX_SCANNABLE_SIZE: u32 = 2047;

/// QR quiet zone, in modules
const QR_QUIET_ZONE: usize = 4;

pub type ScanCode = EncodedImage;

pub trait ScanCodeProvider {
    /// Code for `uri` drawn in the theme's colors, `size` pixels wide if the
    /// source supports sizing
    fn fetch(&self, uri: &SpotifyUri, theme: &Theme, size: u32) -> Option<ScanCode>;
}

/// Spotify Codes from the scannables image service
pub struct SpotifyScannables {
    http: Client,
    base_url: String,
}

impl SpotifyScannables {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn code_url(&self, uri: &SpotifyUri, theme: &Theme, size: u32) -> String {
        format!(
            "{}/uri/plain/png/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            theme.background().to_hex(),
            theme.foreground().name.as_str(),
            size.clamp(MIN_SCANNABLE_SIZE, MAX_SCANNABLE_SIZE),
            uri
        )
    }

    fn try_fetch(&self, url: &str) -> Result<ScanCode, String> {
        let response = self.http.get(url).send().map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status().as_u16()));
        }
        let bytes = response.bytes().map_err(|e| e.to_string())?;
        EncodedImage::from_raster(bytes.to_vec()).map_err(|e| e.to_string())
    }
}

impl ScanCodeProvider for SpotifyScannables {
    fn fetch(&self, uri: &SpotifyUri, theme: &Theme, size: u32) -> Option<ScanCode> {
        let url = self.code_url(uri, theme, size);
        match self.try_fetch(&url) {
            Ok(code) => {
                tracing::debug!(url = %url, width = code.width, height = code.height, "Fetched scan code");
                Some(code)
            }
            Err(reason) => {
                tracing::warn!(url = %url, %reason, "Scan code unavailable, leaving it out");
                None
            }
        }
    }
}

/// QR code of the web link, generated locally as SVG
#[derive(Debug, Default)]
pub struct QrScanCode;

impl QrScanCode {
    fn build_svg(data: &str, theme: &Theme) -> Result<ScanCode, String> {
        let qr = fast_qr::QRBuilder::new(data)
            .ecl(ECL::M)
            .build()
            .map_err(|e| e.to_string())?;

        let total = qr.size + 2 * QR_QUIET_ZONE;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="{total}" viewBox="0 0 {total} {total}" shape-rendering="crispEdges"><rect width="{total}" height="{total}" fill="{}"/><path fill="{}" d=""#,
            theme.background().to_css(),
            theme.foreground().color.to_css()
        );

        for row in 0..qr.size {
            for col in 0..qr.size {
                if qr[row][col].value() {
                    let x = col + QR_QUIET_ZONE;
                    let y = row + QR_QUIET_ZONE;
                    let _ = write!(svg, "M{x} {y}h1v1h-1z");
                }
            }
        }
        svg.push_str(r#""/></svg>"#);

        Ok(ScanCode {
            mime: "image/svg+xml".to_string(),
            bytes: svg.into_bytes(),
            width: total as u32,
            height: total as u32,
        })
    }
}

impl ScanCodeProvider for QrScanCode {
    fn fetch(&self, uri: &SpotifyUri, theme: &Theme, _size: u32) -> Option<ScanCode> {
        match Self::build_svg(&uri.web_url(), theme) {
            Ok(code) => Some(code),
            Err(reason) => {
                tracing::warn!(uri = %uri, %reason, "QR code generation failed, leaving it out");
                None
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct NoScanCode;

impl ScanCodeProvider for NoScanCode {
    fn fetch(&self, _uri: &SpotifyUri, _theme: &Theme, _size: u32) -> Option<ScanCode> {
        None
    }
}

/// Provider selected by the `scan_code` setting
pub fn provider_for(kind: ScanCodeKind, scannables_base: &str) -> Box<dyn ScanCodeProvider> {
    match kind {
        ScanCodeKind::Spotify => {
            match Client::builder().timeout(Duration::from_secs(30)).build() {
                Ok(http) => Box::new(SpotifyScannables::new(http, scannables_base)),
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot build HTTP client, scan codes disabled");
                    Box::new(NoScanCode)
                }
            }
        }
        ScanCodeKind::Qr => Box::new(QrScanCode),
        ScanCodeKind::None => Box::new(NoScanCode),
    }
}
