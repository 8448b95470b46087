//! Test fixtures and constants.

use std::path::Path;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

/// Tile pool used by the end-to-end scenarios
pub mod tiles {
    pub const CRIMSON: (&str, [u8; 3]) = ("crimson.png", [220, 20, 60]);
    pub const NAVY: (&str, [u8; 3]) = ("navy.png", [0, 0, 128]);
    pub const FOREST: (&str, [u8; 3]) = ("forest.png", [34, 139, 34]);
    pub const GOLD: (&str, [u8; 3]) = ("gold.png", [255, 215, 0]);
    pub const SLATE: (&str, [u8; 3]) = ("slate.png", [112, 128, 144]);

    pub const ALL: [(&str, [u8; 3]); 5] = [CRIMSON, NAVY, FOREST, GOLD, SLATE];
}

/// Name pool used by the end-to-end scenarios
pub mod names {
    pub const ALL: [(&str, [u8; 3]); 5] = [
        ("Scarlet", [255, 36, 0]),
        ("Cobalt", [0, 71, 171]),
        ("Emerald", [80, 200, 120]),
        ("Mustard", [255, 219, 88]),
        ("Charcoal", [54, 69, 79]),
    ];
}

pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const GREEN: [u8; 3] = [0, 255, 0];

/// Write a flat-colored square PNG
pub fn write_tile(path: &Path, rgb: [u8; 3], size: u32) {
    let mut pixmap = Pixmap::new(size, size).unwrap();
    pixmap.fill(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255));
    pixmap.save_png(path).unwrap();
}

/// Write a directory of flat tiles
pub fn write_tiles(dir: &Path, tiles: &[(&str, [u8; 3])]) {
    for (name, rgb) in tiles {
        write_tile(&dir.join(name), *rgb, 12);
    }
}

/// Named-color JSON in the reference file format
pub fn names_json(names: &[(&str, [u8; 3])]) -> String {
    let entries: Vec<serde_json::Value> = names
        .iter()
        .map(|(name, [r, g, b])| serde_json::json!({ "name": name, "rgb": [r, g, b] }))
        .collect();
    serde_json::to_string_pretty(&entries).unwrap()
}

/// Write a 10-pixel-wide source image made of horizontal bands, one row
/// per pixel of height
pub fn write_banded_image(path: &Path, bands: &[([u8; 3], u32)]) {
    let height: u32 = bands.iter().map(|(_, rows)| rows).sum();
    let mut pixmap = Pixmap::new(10, height).unwrap();
    let mut top = 0;
    for ([r, g, b], rows) in bands {
        let mut paint = Paint::default();
        paint.set_color_rgba8(*r, *g, *b, 255);
        paint.anti_alias = false;
        let rect = Rect::from_xywh(0.0, top as f32, 10.0, *rows as f32).unwrap();
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        top += rows;
    }
    pixmap.save_png(path).unwrap();
}
