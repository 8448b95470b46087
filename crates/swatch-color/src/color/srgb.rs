//! sRGB color type
//!
//! sRGB is the encoding used by image files and by the named-color reference
//! set. It is gamma-compressed, so it is never used directly for distances.

use std::fmt;
use std::str::FromStr;

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb;
use crate::error::InvalidColorError;

/// A color in sRGB color space.
///
/// Channels are always finite and in 0.0..=1.0 (mapping to 0..255 for
/// 8-bit). Every constructor either guarantees that or checks it, so an
/// `Srgb` always has a well-defined L*a*b* value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub(crate) r: f32,
    pub(crate) g: f32,
    pub(crate) b: f32,
}

impl Srgb {
    /// Create an Srgb color from float channels, validating the range.
    ///
    /// # Errors
    ///
    /// [`InvalidColorError::NonFinite`] for NaN/infinite channels and
    /// [`InvalidColorError::OutOfRange`] for channels outside 0.0..=1.0.
    ///
    /// # Example
    /// ```
    /// use swatch_color::Srgb;
    /// assert!(Srgb::try_new(1.0, 0.5, 0.0).is_ok());
    /// assert!(Srgb::try_new(1.5, 0.5, 0.0).is_err());
    /// ```
    pub fn try_new(r: f32, g: f32, b: f32) -> Result<Self, InvalidColorError> {
        for (channel, value) in [("r", r), ("g", g), ("b", b)] {
            if !value.is_finite() {
                return Err(InvalidColorError::NonFinite { channel });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(InvalidColorError::OutOfRange {
                    channel,
                    value: value as f64,
                });
            }
        }
        Ok(Self { r, g, b })
    }

    /// Create an Srgb color from 8-bit unsigned integer values.
    ///
    /// # Example
    /// ```
    /// use swatch_color::Srgb;
    /// let red = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(red.r(), 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Create an Srgb color from wide integer channels, validating 0..=255.
    ///
    /// Used for colors read from data files, where a channel may be any
    /// integer the file happens to contain.
    pub fn try_from_channels(r: i64, g: i64, b: i64) -> Result<Self, InvalidColorError> {
        let mut bytes = [0u8; 3];
        for (slot, (channel, value)) in bytes.iter_mut().zip([("r", r), ("g", g), ("b", b)]) {
            *slot = u8::try_from(value).map_err(|_| InvalidColorError::OutOfRange {
                channel,
                value: value as f64,
            })?;
        }
        Ok(Self::from_bytes(bytes))
    }

    /// Red channel (gamma-encoded, 0.0..=1.0)
    #[inline]
    pub fn r(self) -> f32 {
        self.r
    }

    #[inline]
    pub fn g(self) -> f32 {
        self.g
    }

    #[inline]
    pub fn b(self) -> f32 {
        self.b
    }

    /// Convert to a byte array [R, G, B].
    ///
    /// Rounds and clamps values to the 0..=255 range.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb(linear.r),
            g: linear_to_srgb(linear.g),
            b: linear_to_srgb(linear.b),
        }
    }
}

impl FromStr for Srgb {
    type Err = InvalidColorError;

    /// Parse an sRGB color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    ///
    /// ```
    /// use swatch_color::Srgb;
    ///
    /// let red: Srgb = "#F00".parse().unwrap();
    /// assert_eq!(red.to_bytes(), [255, 0, 0]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(InvalidColorError::InvalidLength(s.chars().count()));
        }

        match s.len() {
            3 => {
                // #RGB expands each digit: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_u8(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_u8(r, g, b))
            }
            len => Err(InvalidColorError::InvalidLength(len)),
        }
    }
}
