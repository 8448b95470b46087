//! Error type for malformed color input

use std::fmt;
use std::num::ParseIntError;

/// Returned when a color cannot be represented as a valid sRGB value.
///
/// Every way of constructing a color from untrusted input (floats, integer
/// channels, hex strings) reports through this one type so that callers
/// can treat "bad color" as a single failure class.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidColorError {
    /// A channel is outside its allowed range
    OutOfRange {
        /// Channel name (`"r"`, `"g"` or `"b"`)
        channel: &'static str,
        /// The offending value
        value: f64,
    },
    /// A channel is NaN or infinite
    NonFinite {
        /// Channel name (`"r"`, `"g"` or `"b"`)
        channel: &'static str,
    },
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength(usize),
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for InvalidColorError {
    fn from(err: ParseIntError) -> Self {
        InvalidColorError::InvalidHex(err)
    }
}

impl fmt::Display for InvalidColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidColorError::OutOfRange { channel, value } => {
                write!(f, "channel {channel} out of range: {value}")
            }
            InvalidColorError::NonFinite { channel } => {
                write!(f, "channel {channel} is not a finite number")
            }
            InvalidColorError::InvalidLength(len) => {
                write!(
                    f,
                    "invalid hex color length {len} (expected 3 or 6 characters)"
                )
            }
            InvalidColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for InvalidColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvalidColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}
