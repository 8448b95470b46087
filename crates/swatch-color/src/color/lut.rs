//! Gamma lookup tables generated by build.rs

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Last valid table index.
const LAST: usize = 4095;

/// Interpolated lookup of `x` (clamped to 0.0..=1.0, NaN read as 0.0) in
/// a 4096-entry table.
#[inline]
fn lookup(table: &[f32; LAST + 1], x: f32) -> f32 {
    let x = if x.is_nan() { 0.0 } else { x };
    let scaled = x.clamp(0.0, 1.0) * LAST as f32;
    let index = scaled as usize;
    if index >= LAST {
        return table[LAST];
    }
    let frac = scaled - index as f32;
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * frac
}

/// Convert an sRGB value (0.0..=1.0) to linear RGB.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    lookup(&SRGB_TO_LINEAR, srgb)
}

/// Convert a linear RGB value (0.0..=1.0) to sRGB.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    lookup(&LINEAR_TO_SRGB, linear)
}
