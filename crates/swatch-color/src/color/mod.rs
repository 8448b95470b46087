//! Color types and conversions
//!
//! - [`Srgb`]: gamma-encoded device RGB, used for input and output
//! - [`LinearRgb`]: linear light, the step between sRGB and XYZ
//! - [`Lab`]: CIE L*a*b* (D65), the perceptual space all matching runs in
//!
//! ```
//! use swatch_color::{Lab, Srgb};
//!
//! let lab = Lab::from(Srgb::from_u8(255, 255, 255));
//! assert!((lab.l - 100.0).abs() < 0.1);
//! ```

mod lab;
mod linear_rgb;
mod lut;
mod srgb;

pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use srgb::Srgb;
