use crate::assets::AssetLoader;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use swatch_color::{DistanceMetric, Srgb};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub card: CardConfig,
    pub fonts: FontConfig,
    pub colors: ColorConfig,
}

/// Tile grid geometry
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
    /// Edge length of one (square) tile in pixels
    pub tile_width: u32,
}

impl GridConfig {
    /// Number of cells in the grid
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Grid width in pixels, `None` if it does not fit in a `u32`
    pub fn pixel_width(&self) -> Option<u32> {
        self.width.checked_mul(self.tile_width)
    }

    pub fn pixel_height(&self) -> Option<u32> {
        self.height.checked_mul(self.tile_width)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            tile_width: 54,
        }
    }
}

/// Card canvas and legend geometry
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CardConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical gap between grid, title and legend
    pub margin: u32,
    /// Left/right inset of the legend
    pub table_margin: u32,
    /// Background fill as hex
    pub background: String,
    /// Optional background image, drawn over the fill
    pub background_image: Option<PathBuf>,
    /// Horizontal pixel pitch the leader dots snap to
    pub leader_pitch: u32,
    /// Top-left corner of the grid on the card
    pub grid_offset: [u32; 2],
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 1000,
            margin: 30,
            table_margin: 40,
            background: "#fbf8f1".to_string(),
            background_image: None,
            leader_pitch: 10,
            grid_offset: [30, 30],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub header_size: f32,
    pub size: f32,
    /// Text color as hex
    pub color: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "serif".to_string(),
            header_size: 28.0,
            size: 20.0,
            color: "#333333".to_string(),
        }
    }
}

/// Perceptual distance metric selectable from config
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricName {
    #[default]
    Ciede2000,
    Cie76,
}

impl From<MetricName> for DistanceMetric {
    fn from(name: MetricName) -> Self {
        match name {
            MetricName::Ciede2000 => DistanceMetric::Ciede2000,
            MetricName::Cie76 => DistanceMetric::Cie76,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    /// Dominant colors to request from the extractor
    pub count: usize,
    pub metric: MetricName,
    /// Named-color reference file; embedded default when unset
    pub palette: Option<PathBuf>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            count: 12,
            metric: MetricName::default(),
            palette: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        grid = %format!("{}x{}", config.grid.width, config.grid.height),
                        colors = config.colors.count,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Check the values the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("grid.width", self.grid.width),
            ("grid.height", self.grid.height),
            ("grid.tile_width", self.grid.tile_width),
            ("card.width", self.card.width),
            ("card.height", self.card.height),
            ("card.leader_pitch", self.card.leader_pitch),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if self.colors.count == 0 {
            return Err(ConfigError::Zero {
                field: "colors.count",
            });
        }
        if self.fonts.size <= 0.0 {
            return Err(ConfigError::Zero { field: "fonts.size" });
        }
        if self.fonts.header_size <= 0.0 {
            return Err(ConfigError::Zero {
                field: "fonts.header_size",
            });
        }

        let [offset_x, offset_y] = self.card.grid_offset;
        let too_large = || ConfigError::GridTooLarge {
            card_width: self.card.width,
            card_height: self.card.height,
            grid_width: self.grid.pixel_width().unwrap_or(u32::MAX),
            grid_height: self.grid.pixel_height().unwrap_or(u32::MAX),
        };
        let right = self
            .grid
            .pixel_width()
            .and_then(|w| w.checked_add(offset_x))
            .ok_or_else(too_large)?;
        let bottom = self
            .grid
            .pixel_height()
            .and_then(|h| h.checked_add(offset_y))
            .ok_or_else(too_large)?;
        if right > self.card.width || bottom > self.card.height {
            return Err(too_large());
        }

        self.background_color()?;
        self.text_color()?;

        if self.grid.capacity() != 100 {
            tracing::warn!(
                cells = self.grid.capacity(),
                "Grid does not have 100 cells; allocations will not map one-to-one"
            );
        }
        Ok(())
    }

    pub fn background_color(&self) -> Result<Srgb, ConfigError> {
        self.card
            .background
            .parse()
            .map_err(|source| ConfigError::Color {
                field: "card.background",
                source,
            })
    }

    pub fn text_color(&self) -> Result<Srgb, ConfigError> {
        self.fonts.color.parse().map_err(|source| ConfigError::Color {
            field: "fonts.color",
            source,
        })
    }

    pub fn metric(&self) -> DistanceMetric {
        self.colors.metric.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.grid.capacity(), 100);
        assert_eq!(config.grid.pixel_width(), Some(540));
        assert_eq!(config.card.leader_pitch, 10);
        assert_eq!(config.colors.count, 12);
        assert_eq!(config.metric(), DistanceMetric::Ciede2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r##"
grid:
  width: 10
  height: 10
  tile_width: 40
card:
  width: 500
  height: 900
  background: "#fdf6e3"
  grid_offset: [50, 20]
fonts:
  family: "DejaVu Serif"
  size: 18
colors:
  count: 8
  metric: cie76
  palette: my-colors.json
"##;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.grid.tile_width, 40);
        assert_eq!(config.card.width, 500);
        assert_eq!(config.card.grid_offset, [50, 20]);
        // Unspecified fields keep their defaults
        assert_eq!(config.card.margin, 30);
        assert_eq!(config.fonts.header_size, 28.0);
        assert_eq!(config.fonts.size, 18.0);
        assert_eq!(config.colors.count, 8);
        assert_eq!(config.metric(), DistanceMetric::Cie76);
        assert_eq!(config.colors.palette, Some(PathBuf::from("my-colors.json")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.card, CardConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = AppConfig::default();
        config.grid.tile_width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "grid.tile_width"
            })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let mut config = AppConfig::default();
        config.card.width = 500;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overflowing_grid() {
        let mut config = AppConfig::default();
        config.grid.tile_width = u32::MAX / 4;
        assert_eq!(config.grid.pixel_width(), None);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                grid_width: u32::MAX,
                ..
            })
        ));

        let mut config = AppConfig::default();
        config.card.grid_offset = [u32::MAX - 100, 0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let loader = AssetLoader::new(None, None, None);
        let yaml = loader.read_config_string().unwrap();
        let embedded: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(embedded.grid, defaults.grid);
        assert_eq!(embedded.card, defaults.card);
        assert_eq!(embedded.fonts, defaults.fonts);
        assert_eq!(embedded.colors, defaults.colors);
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let mut config = AppConfig::default();
        config.fonts.color = "#12345".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Color {
                field: "fonts.color",
                ..
            })
        ));
    }

    #[test]
    fn test_non_square_hundred_is_allowed() {
        let mut config = AppConfig::default();
        config.grid.width = 20;
        config.grid.height = 5;
        config.grid.tile_width = 27;
        assert!(config.validate().is_ok());
    }
}
