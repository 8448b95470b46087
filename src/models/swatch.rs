use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use swatch_color::{InvalidColorError, Lab, Srgb};

/// Anything that takes part in nearest-color matching.
pub trait Swatch {
    fn lab(&self) -> Lab;
}

/// One dominant color of the source image and how many pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub rgb: Srgb,
    pub lab: Lab,
    pub count: u64,
}

impl ColorSample {
    pub fn new(rgb: Srgb, count: u64) -> Self {
        Self {
            rgb,
            lab: Lab::from(rgb),
            count,
        }
    }

    pub fn from_bytes(bytes: [u8; 3], count: u64) -> Self {
        Self::new(Srgb::from_bytes(bytes), count)
    }
}

/// A dominant color as written to and read from sample files:
/// `{"rgb": [r, g, b], "count": n}`.
///
/// Channels are kept wide so that out-of-range values in a file surface
/// as [`InvalidColorError`] instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub rgb: [i64; 3],
    pub count: u64,
}

impl From<&ColorSample> for SampleRecord {
    fn from(sample: &ColorSample) -> Self {
        Self {
            rgb: sample.rgb.to_bytes().map(i64::from),
            count: sample.count,
        }
    }
}

impl TryFrom<SampleRecord> for ColorSample {
    type Error = InvalidColorError;

    fn try_from(record: SampleRecord) -> Result<Self, Self::Error> {
        let [r, g, b] = record.rgb;
        Ok(Self::new(Srgb::try_from_channels(r, g, b)?, record.count))
    }
}

impl Swatch for ColorSample {
    fn lab(&self) -> Lab {
        self.lab
    }
}

/// An image file usable as one grid cell, reduced to its dominant color.
#[derive(Debug, Clone, PartialEq)]
pub struct TileAsset {
    pub path: PathBuf,
    pub color: Srgb,
    pub lab: Lab,
}

impl TileAsset {
    pub fn new(path: impl Into<PathBuf>, color: Srgb) -> Self {
        Self {
            path: path.into(),
            color,
            lab: Lab::from(color),
        }
    }
}

impl Swatch for TileAsset {
    fn lab(&self) -> Lab {
        self.lab
    }
}

/// A human-readable color name from the reference set.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub name: String,
    pub color: Srgb,
    pub lab: Lab,
}

impl NamedColor {
    pub fn new(name: impl Into<String>, color: Srgb) -> Self {
        Self {
            name: name.into(),
            color,
            lab: Lab::from(color),
        }
    }
}

impl Swatch for NamedColor {
    fn lab(&self) -> Lab {
        self.lab
    }
}

/// The per-color record threaded through every pipeline stage.
///
/// Created by tile matching, given its `allocation` by the allocator and
/// its `name` by name matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub sample: ColorSample,
    pub tile: TileAsset,
    /// Whole-percent share of the grid, 0..=100
    pub allocation: u32,
    pub name: Option<String>,
}

impl Match {
    pub fn new(sample: ColorSample, tile: TileAsset) -> Self {
        Self {
            sample,
            tile,
            allocation: 0,
            name: None,
        }
    }

    /// Pixel count of the source color.
    pub fn count(&self) -> u64 {
        self.sample.count
    }

    /// Assigned name, or the sample's hex code before naming has run.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.sample.rgb.to_hex())
    }
}

/// Stable sort by allocation, largest first. Equal allocations keep their
/// relative order.
pub fn rank_by_allocation(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.allocation.cmp(&a.allocation));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(name: &str) -> TileAsset {
        TileAsset::new(name, Srgb::from_u8(0, 0, 0))
    }

    #[test]
    fn test_sample_precomputes_lab() {
        let sample = ColorSample::from_bytes([255, 255, 255], 10);
        assert!((sample.lab.l - 100.0).abs() < 0.01);
        assert_eq!(sample.count, 10);
    }

    #[test]
    fn test_sample_record_conversion() {
        let record = SampleRecord {
            rgb: [255, 128, 0],
            count: 42,
        };
        let sample = ColorSample::try_from(record).unwrap();
        assert_eq!(sample.rgb.to_bytes(), [255, 128, 0]);
        assert_eq!(sample.count, 42);
        assert_eq!(SampleRecord::from(&sample), record);

        let bad = SampleRecord {
            rgb: [0, 256, -1],
            count: 1,
        };
        assert!(matches!(
            ColorSample::try_from(bad),
            Err(InvalidColorError::OutOfRange { channel: "g", .. })
        ));
    }

    #[test]
    fn test_match_label_falls_back_to_hex() {
        let mut m = Match::new(ColorSample::from_bytes([255, 0, 0], 1), tile("a.png"));
        assert_eq!(m.label(), "#ff0000");
        m.name = Some("Red".to_string());
        assert_eq!(m.label(), "Red");
    }

    #[test]
    fn test_rank_by_allocation_is_stable() {
        let mut matches: Vec<Match> = [("a", 10), ("b", 30), ("c", 10), ("d", 50)]
            .into_iter()
            .map(|(name, allocation)| Match {
                allocation,
                ..Match::new(ColorSample::from_bytes([0, 0, 0], 1), tile(name))
            })
            .collect();

        rank_by_allocation(&mut matches);

        let order: Vec<_> = matches
            .iter()
            .map(|m| m.tile.path.to_string_lossy().to_string())
            .collect();
        assert_eq!(order, ["d", "b", "a", "c"]);
    }
}
