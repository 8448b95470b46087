//! Dominant color extraction
//!
//! Pixels are binned on a 16x16x16 grid (top four bits of each channel).
//! The most populated bins win; each is reported as the mean of the pixels
//! that fell into it, so a flat-colored region keeps its exact color.

use std::fs;
use std::path::Path;

use swatch_color::Srgb;
use tiny_skia::Pixmap;

use crate::error::AssetError;
use crate::models::ColorSample;

/// Pixels more transparent than this are not counted.
const MIN_ALPHA: u8 = 128;

const BITS: u32 = 4;
const BINS: usize = 1 << (3 * BITS);

#[derive(Debug, Clone, Copy, Default)]
struct Bin {
    count: u64,
    sum: [u64; 3],
}

impl Bin {
    fn mean(&self) -> [u8; 3] {
        let half = self.count / 2;
        self.sum.map(|s| ((s + half) / self.count) as u8)
    }
}

/// Color histogram over one image
struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut bins = vec![Bin::default(); BINS];
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            if color.alpha() < MIN_ALPHA {
                continue;
            }
            let rgb = [color.red(), color.green(), color.blue()];
            let bin = &mut bins[bin_index(rgb)];
            bin.count += 1;
            for (sum, channel) in bin.sum.iter_mut().zip(rgb) {
                *sum += u64::from(channel);
            }
        }
        Self { bins }
    }

    /// Populated bins, most pixels first; equal counts keep bin order.
    fn ranked(&self) -> Vec<&Bin> {
        let mut ranked: Vec<&Bin> = self.bins.iter().filter(|b| b.count > 0).collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

fn bin_index([r, g, b]: [u8; 3]) -> usize {
    let shift = 8 - BITS;
    ((r as usize >> shift) << (2 * BITS)) | ((g as usize >> shift) << BITS) | (b as usize >> shift)
}

/// The `n` most frequent colors of an image, most frequent first.
///
/// Fewer than `n` samples come back when the image has fewer distinct bins.
pub fn dominant_colors(pixmap: &Pixmap, n: usize) -> Vec<ColorSample> {
    let histogram = Histogram::from_pixmap(pixmap);
    histogram
        .ranked()
        .into_iter()
        .take(n)
        .map(|bin| ColorSample::from_bytes(bin.mean(), bin.count))
        .collect()
}

/// The single most frequent color of an image.
pub fn dominant_color(pixmap: &Pixmap, path: &Path) -> Result<Srgb, AssetError> {
    dominant_colors(pixmap, 1)
        .first()
        .map(|sample| sample.rgb)
        .ok_or_else(|| AssetError::EmptyImage {
            path: path.to_path_buf(),
        })
}

/// Dominant colors of the PNG at `path`.
pub fn extract_from_file(path: &Path, n: usize) -> Result<Vec<ColorSample>, AssetError> {
    let pixmap = load_pixmap(path)?;
    let samples = dominant_colors(&pixmap, n);
    if samples.is_empty() {
        return Err(AssetError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(
        path = %path.display(),
        requested = n,
        found = samples.len(),
        "Extracted dominant colors"
    );
    Ok(samples)
}

/// Read and decode a PNG file.
pub fn load_pixmap(path: &Path) -> Result<Pixmap, AssetError> {
    let data = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Pixmap::decode_png(&data).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
