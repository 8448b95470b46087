//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use std::collections::HashSet;

use swatchcard::models::Match;

/// Assert bytes are a PNG of the given size
pub fn assert_png(bytes: &[u8], width: u32, height: u32) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let pixmap = tiny_skia::Pixmap::decode_png(bytes).expect("PNG should decode");
    assert_eq!((pixmap.width(), pixmap.height()), (width, height));
}

/// Assert allocations are positive and total exactly 100
pub fn assert_allocations_total_100(matches: &[Match]) {
    let total: u32 = matches.iter().map(|m| m.allocation).sum();
    assert_eq!(total, 100, "allocations: {:?}", allocations(matches));
    assert!(
        matches.iter().all(|m| m.allocation >= 1),
        "allocations: {:?}",
        allocations(matches)
    );
}

/// Assert no tile and no name appears twice
pub fn assert_no_reuse(matches: &[Match]) {
    let tiles: HashSet<_> = matches.iter().map(|m| m.tile.path.clone()).collect();
    assert_eq!(tiles.len(), matches.len(), "a tile was claimed twice");

    let names: HashSet<_> = matches.iter().map(|m| m.name.clone()).collect();
    assert_eq!(names.len(), matches.len(), "a name was claimed twice");
    assert!(matches.iter().all(|m| m.name.is_some()), "unnamed match");
}

pub fn allocations(matches: &[Match]) -> Vec<u32> {
    matches.iter().map(|m| m.allocation).collect()
}

/// File names of the matched tiles, in match order
pub fn tile_names(matches: &[Match]) -> Vec<String> {
    matches
        .iter()
        .map(|m| {
            m.tile
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        })
        .collect()
}

pub fn labels(matches: &[Match]) -> Vec<String> {
    matches.iter().map(Match::label).collect()
}
