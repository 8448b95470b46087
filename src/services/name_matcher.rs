use std::path::Path;

use serde::Deserialize;
use swatch_color::{DistanceMetric, Srgb};

use crate::assets::AssetLoader;
use crate::error::{AssetError, PipelineError};
use crate::models::{rank_by_allocation, Match, NamedColor};
use crate::services::pool::Pool;

/// Reference names available to one run
pub type NamedColorSet = Pool<NamedColor>;

/// One entry of a color-name file: `{"name", "hex"}` or `{"name", "rgb"}`
#[derive(Debug, Deserialize)]
struct NamedColorEntry {
    name: String,
    #[serde(default)]
    hex: Option<String>,
    #[serde(default)]
    rgb: Option<[i64; 3]>,
}

impl NamedColorEntry {
    fn into_named_color(self) -> Result<NamedColor, AssetError> {
        let color = match (&self.hex, self.rgb) {
            (Some(hex), _) => hex.parse::<Srgb>(),
            (None, Some([r, g, b])) => Srgb::try_from_channels(r, g, b),
            (None, None) => return Err(AssetError::MissingColor { name: self.name }),
        };
        match color {
            Ok(color) => Ok(NamedColor::new(self.name, color)),
            Err(source) => Err(AssetError::NamedColor {
                name: self.name,
                source,
            }),
        }
    }
}

impl Pool<NamedColor> {
    /// Parse a JSON array of named colors.
    pub fn from_json(data: &[u8]) -> Result<Self, AssetError> {
        let entries: Vec<NamedColorEntry> = serde_json::from_slice(data)?;
        entries
            .into_iter()
            .map(NamedColorEntry::into_named_color)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Load the configured color-name file, or the built-in set.
    pub fn load(loader: &AssetLoader, explicit: Option<&Path>) -> Result<Self, AssetError> {
        let data = loader
            .read_colors(explicit)
            .map_err(|source| AssetError::Read {
                path: explicit
                    .or(loader.colors_file())
                    .unwrap_or(Path::new(crate::assets::DEFAULT_COLORS))
                    .to_path_buf(),
                source,
            })?;
        let set = Self::from_json(&data)?;
        tracing::info!(names = set.len(), "Loaded color names");
        Ok(set)
    }
}

/// Give each match the nearest unused name from the reference set.
///
/// Matches are ranked by allocation first so the most prominent colors
/// pick before the rest. Distance is measured against the source color,
/// not the tile standing in for it. Returns the matches in ranked order.
pub fn match_names(
    mut matches: Vec<Match>,
    names: &mut NamedColorSet,
    metric: DistanceMetric,
) -> Result<Vec<Match>, PipelineError> {
    let available = names.len();
    if matches.len() > available {
        return Err(PipelineError::NoNamesAvailable {
            requested: matches.len(),
            available,
        });
    }

    rank_by_allocation(&mut matches);
    let requested = matches.len();
    for m in &mut matches {
        let Some((named, distance)) = names.claim_nearest(m.sample.lab, metric) else {
            return Err(PipelineError::NoNamesAvailable {
                requested,
                available,
            });
        };
        tracing::debug!(
            color = %m.sample.rgb,
            name = %named.name,
            distance,
            "Claimed name"
        );
        m.name = Some(named.name);
    }
    Ok(matches)
}
