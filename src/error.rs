use std::path::PathBuf;

use swatch_color::InvalidColorError;
use thiserror::Error;

/// Failure of a report run. Every stage fails fast; nothing is rendered
/// from a partial result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid color: {0}")]
    InvalidColor(#[from] InvalidColorError),

    #[error("No tiles available: {requested} colors requested, {available} tiles in pool")]
    NoTilesAvailable { requested: usize, available: usize },

    #[error("No names available: {requested} colors to name, {available} names in reference set")]
    NoNamesAvailable { requested: usize, available: usize },

    #[error("Every color rounded to a zero share; nothing to allocate")]
    EmptyAllocation,

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Invalid card config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image {path} has no opaque pixels")]
    EmptyImage { path: PathBuf },

    #[error("Invalid color list: {0}")]
    ColorList(#[from] serde_json::Error),

    #[error("Invalid color for {name:?}: {source}")]
    NamedColor {
        name: String,
        source: InvalidColorError,
    },

    #[error("Named color {name:?} has neither `hex` nor `rgb`")]
    MissingColor { name: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("Card {card_width}x{card_height} cannot hold a {grid_width}x{grid_height} px grid")]
    GridTooLarge {
        card_width: u32,
        card_height: u32,
        grid_width: u32,
        grid_height: u32,
    },

    #[error("Invalid color for {field}: {source}")]
    Color {
        field: &'static str,
        source: InvalidColorError,
    },
}
