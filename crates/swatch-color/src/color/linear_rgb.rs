//! Linear RGB color type

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB, proportional to light intensity.
///
/// Only an intermediate step between [`Srgb`] and the CIE XYZ / L*a*b*
/// conversion; the gamma curve must be removed before the XYZ matrix applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// CIE XYZ tristimulus values under D65, with Y of white at 1.0.
    pub fn to_xyz(self) -> [f32; 3] {
        let Self { r, g, b } = self;
        [
            0.4124564 * r + 0.3575761 * g + 0.1804375 * b,
            0.2126729 * r + 0.7151522 * g + 0.0721750 * b,
            0.0193339 * r + 0.1191920 * g + 0.9503041 * b,
        ]
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self::new(
            srgb_to_linear(srgb.r),
            srgb_to_linear(srgb.g),
            srgb_to_linear(srgb.b),
        )
    }
}
