pub mod config;
pub mod swatch;

pub use config::{AppConfig, CardConfig, ColorConfig, FontConfig, GridConfig, MetricName};
pub use swatch::{
    rank_by_allocation, ColorSample, Match, NamedColor, SampleRecord, Swatch, TileAsset,
};
