use std::fs;
use std::path::{Path, PathBuf};

use swatch_color::DistanceMetric;

use crate::error::{AssetError, PipelineError};
use crate::models::{ColorSample, Match, TileAsset};
use crate::services::extractor;
use crate::services::pool::Pool;

/// Tile images available to one run
pub type TilePool = Pool<TileAsset>;

impl Pool<TileAsset> {
    pub fn from_assets(assets: Vec<TileAsset>) -> Self {
        Self::new(assets)
    }

    /// Load every PNG in `dir`, reducing each to its most frequent color.
    ///
    /// Files are visited in name order. Anything without a `.png`
    /// extension is skipped; a PNG that fails to decode is an error.
    pub fn scan_dir(dir: &Path) -> Result<Self, AssetError> {
        let read_err = |source| AssetError::Read {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if !path.is_file() {
                continue;
            }
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if is_png {
                paths.push(path);
            } else {
                tracing::debug!(path = %path.display(), "Skipping non-PNG file in tile directory");
            }
        }
        paths.sort();

        let mut tiles = Vec::with_capacity(paths.len());
        for path in paths {
            let pixmap = extractor::load_pixmap(&path)?;
            let color = extractor::dominant_color(&pixmap, &path)?;
            tracing::debug!(path = %path.display(), color = %color, "Scanned tile");
            tiles.push(TileAsset::new(path, color));
        }

        tracing::info!(dir = %dir.display(), tiles = tiles.len(), "Loaded tile pool");
        Ok(Self::new(tiles))
    }
}

/// Bind each sample, in the order given, to the nearest tile still in
/// the pool.
///
/// Greedy and order-dependent: earlier samples get first pick. Claimed
/// tiles leave the pool, so no tile is used twice.
pub fn match_tiles(
    samples: &[ColorSample],
    pool: &mut TilePool,
    metric: DistanceMetric,
) -> Result<Vec<Match>, PipelineError> {
    let available = pool.len();
    let exhausted = PipelineError::NoTilesAvailable {
        requested: samples.len(),
        available,
    };
    if samples.len() > available {
        return Err(exhausted);
    }

    let mut matches = Vec::with_capacity(samples.len());
    for sample in samples {
        let Some((tile, distance)) = pool.claim_nearest(sample.lab, metric) else {
            return Err(exhausted);
        };
        tracing::debug!(
            color = %sample.rgb,
            tile = %tile.path.display(),
            distance,
            "Claimed tile"
        );
        matches.push(Match::new(*sample, tile));
    }
    Ok(matches)
}
