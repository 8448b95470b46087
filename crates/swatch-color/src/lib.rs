//! swatch-color: perceptual color matching primitives
//!
//! This library converts device RGB colors into CIE L*a*b* and measures
//! perceptual color differences between them. It is the distance engine
//! behind tile matching and color naming.
//!
//! # Quick Start
//!
//! ```
//! use swatch_color::{DistanceMetric, Lab, Srgb};
//!
//! let sky: Srgb = "#87ceeb".parse().unwrap();
//! let steel: Srgb = "#4682b4".parse().unwrap();
//!
//! let d = DistanceMetric::Ciede2000.distance(Lab::from(sky), Lab::from(steel));
//! assert!(d > 0.0);
//! ```
//!
//! # Color Spaces
//!
//! | Color Space | Key Property | Used For |
//! |-------------|--------------|----------|
//! | **sRGB** | Standard encoding (IEC 61966-2-1) | Image pixels, hex strings, output |
//! | **Linear RGB** | Proportional to light intensity | Input to the XYZ matrix |
//! | **L\*a\*b\*** | Perceptually uniform (approximately) | All distance computations |
//!
//! Gamma decoding uses lookup tables generated at build time (see
//! `build.rs`). The XYZ matrix and white point are the standard sRGB/D65
//! values.
//!
//! # Distance
//!
//! [`DistanceMetric::Ciede2000`] is the default. Euclidean L*a*b* distance
//! (CIE76) over-weights saturated colors, so two vivid reds can end up
//! further apart than a grey and a beige that look clearly different.
//! CIEDE2000 corrects for lightness, chroma and hue non-uniformities and
//! adds a rotation term for the blue region.
//!
//! Malformed input (out-of-range channels, bad hex) fails with
//! [`InvalidColorError`]; conversion and distance functions themselves are
//! infallible.

pub mod color;
pub mod distance;
pub mod error;

pub use color::{Lab, LinearRgb, Srgb};
pub use distance::DistanceMetric;
pub use error::InvalidColorError;
