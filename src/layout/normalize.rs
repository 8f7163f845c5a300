//! Track name cleanup

use regex::Regex;
use std::sync::OnceLock;

fn parenthesized() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\([^)]*\)").expect("pattern is valid"))
}

fn bracketed() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("pattern is valid"))
}

/// Remove `(...)` and `[...]` groups (featuring credits, remaster notes) and trim.
pub fn strip_featured(track: &str) -> String {
    let without_parens = parenthesized().replace_all(track, "");
    let without_brackets = bracketed().replace_all(&without_parens, "");
    without_brackets.trim().to_string()
}

/// Apply [`strip_featured`] to every track when `enabled`
pub fn normalize_tracks(tracks: &[String], enabled: bool) -> Vec<String> {
    if enabled {
        tracks.iter().map(|t| strip_featured(t)).collect()
    } else {
        tracks.to_vec()
    }
}
