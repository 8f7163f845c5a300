//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert `path` is a PNG of the given size
pub fn assert_png_file(path: &Path, width: u32, height: u32) {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected poster at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG image at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let dimensions = image::image_dimensions(path).expect("Failed to read PNG dimensions");
    assert_eq!(dimensions, (width, height), "Unexpected poster size");
}

/// Assert the directory contains no files
pub fn assert_empty_dir(dir: &Path) {
    let entries: Vec<_> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .flatten()
        .map(|e| e.file_name())
        .collect();
    assert!(entries.is_empty(), "Expected no files, found {entries:?}");
}
