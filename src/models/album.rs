//! Album record and text helpers shared by the metadata client and compositor

use crate::models::link::SpotifyUri;
use chrono::NaiveDate;

/// Text with the language tag used to pick a font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    pub text: String,
    pub lang: String,
}

impl Localized {
    /// Tag the text with the language detected from its script
    pub fn detect(text: impl Into<String>) -> Self {
        let text = text.into();
        let lang = detect_language(&text).to_string();
        Self { text, lang }
    }
}

/// Everything a poster needs about one album (or playlist)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumData {
    pub artist: Localized,
    pub title: Localized,
    /// Track names in album order
    pub tracks: Vec<String>,
    /// Total running time, preformatted (e.g. `"42:17"`)
    pub playtime: String,
    pub label: Localized,
    /// Release date, preformatted (e.g. `"May 17, 2019"`)
    pub release_date: String,
    pub artwork_url: String,
    pub uri: SpotifyUri,
}

/// Guess a language tag from the writing system.
///
/// Kana wins over Han so Japanese titles with kanji still get a Japanese font.
pub fn detect_language(text: &str) -> &'static str {
    let mut han = false;
    let mut cyrillic = false;
    let mut greek = false;
    let mut arabic = false;
    let mut hebrew = false;
    let mut thai = false;

    for c in text.chars() {
        match c as u32 {
            0x3040..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F => return "ja",
            0xAC00..=0xD7AF | 0x1100..=0x11FF | 0x3130..=0x318F => return "ko",
            0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF => han = true,
            0x0400..=0x04FF => cyrillic = true,
            0x0370..=0x03FF => greek = true,
            0x0600..=0x06FF => arabic = true,
            0x0590..=0x05FF => hebrew = true,
            0x0E00..=0x0E7F => thai = true,
            _ => {}
        }
    }

    if han {
        "zh"
    } else if cyrillic {
        "ru"
    } else if greek {
        "el"
    } else if arabic {
        "ar"
    } else if hebrew {
        "he"
    } else if thai {
        "th"
    } else {
        "en"
    }
}

/// Characters that are not allowed in output file names.
///
/// `/` and NUL are included so a title can never name another directory.
const DISALLOWED_FILENAME_CHARS: &[char] = &[
    '#', '%', '&', '{', '}', '\\', '<', '>', '*', '?', ' ', '$', '!', '\'', '"', ':', '@', '+',
    '`', '|', '=', '/', '\0',
];

/// Replace every disallowed file name character with `_`
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if DISALLOWED_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Format a running time as `M:SS`, or `H:MM:SS` from one hour up
pub fn format_playtime(total_ms: u64) -> String {
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a release date according to its precision (`day`, `month`, `year`).
///
/// Anything that does not parse is returned unchanged.
pub fn format_release_date(date: &str, precision: &str) -> String {
    let parsed = match precision {
        "day" => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%B %-d, %Y").to_string()),
        "month" => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%B %Y").to_string()),
        _ => None,
    };
    parsed.unwrap_or_else(|| date.to_string())
}
