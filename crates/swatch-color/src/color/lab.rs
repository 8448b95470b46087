//! CIE L*a*b* perceptual color space
//!
//! L*a*b* is the space the CIE color-difference formulas are defined in.
//! CIEDE2000 on top of it approximates how different two colors *look*,
//! which is what tile and name matching need: a match that is visually
//! coherent rather than numerically nearest in RGB.
//!
//! # References
//!
//! Sharma, Wu, Dalal, "The CIEDE2000 Color-Difference Formula:
//! Implementation Notes, Supplementary Test Data, and Mathematical
//! Observations", Color Research & Application, 2005.

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// D65 reference white (Y normalized to 1.0)
const WHITE_X: f32 = 0.95047;
const WHITE_Y: f32 = 1.0;
const WHITE_Z: f32 = 1.08883;

/// CIE epsilon (216/24389) and kappa (24389/27), exact rational forms.
const EPSILON: f32 = 216.0 / 24389.0;
const KAPPA: f32 = 24389.0 / 27.0;

/// 25^7, used by the CIEDE2000 chroma compensation terms.
const POW25_7: f64 = 6_103_515_625.0;

/// A color in CIE L*a*b* space (D65 white point).
///
/// - `l`: lightness, 0.0 (black) to 100.0 (white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
///
/// Derived deterministically from an sRGB color; used only for distance
/// computation, never for pixel output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Lab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// CIE76 color difference: Euclidean distance in L*a*b*.
    ///
    /// ```
    /// use swatch_color::Lab;
    ///
    /// let black = Lab::new(0.0, 0.0, 0.0);
    /// let white = Lab::new(100.0, 0.0, 0.0);
    /// assert_eq!(black.delta_e_76(white), 100.0);
    /// ```
    #[inline]
    pub fn delta_e_76(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// CIEDE2000 color difference with unit weighting factors (kL = kC = kH = 1).
    ///
    /// Symmetric, non-negative, and zero for identical colors. Computed in
    /// f64 internally; the hue terms lose too much precision in f32 near
    /// the neutral axis.
    ///
    /// ```
    /// use swatch_color::Lab;
    ///
    /// let a = Lab::new(50.0, 2.6772, -79.7751);
    /// let b = Lab::new(50.0, 0.0, -82.7485);
    /// assert!((a.delta_e_2000(b) - 2.0425).abs() < 1e-3);
    /// ```
    pub fn delta_e_2000(self, other: Lab) -> f32 {
        let (l1, a1, b1) = (self.l as f64, self.a as f64, self.b as f64);
        let (l2, a2, b2) = (other.l as f64, other.a as f64, other.b as f64);

        let c1 = (a1 * a1 + b1 * b1).sqrt();
        let c2 = (a2 * a2 + b2 * b2).sqrt();
        let c_bar7 = ((c1 + c2) / 2.0).powi(7);
        let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

        let a1p = a1 * (1.0 + g);
        let a2p = a2 * (1.0 + g);
        let c1p = (a1p * a1p + b1 * b1).sqrt();
        let c2p = (a2p * a2p + b2 * b2).sqrt();
        let h1p = hue_degrees(b1, a1p);
        let h2p = hue_degrees(b2, a2p);

        let dl = l2 - l1;
        let dc = c2p - c1p;
        let chroma_product = c1p * c2p;

        let dh_deg = if chroma_product == 0.0 {
            0.0
        } else if (h2p - h1p).abs() <= 180.0 {
            h2p - h1p
        } else if h2p - h1p > 180.0 {
            h2p - h1p - 360.0
        } else {
            h2p - h1p + 360.0
        };
        let dh = 2.0 * chroma_product.sqrt() * (dh_deg.to_radians() / 2.0).sin();

        let l_bar = (l1 + l2) / 2.0;
        let c_bar_p = (c1p + c2p) / 2.0;
        let h_bar = if chroma_product == 0.0 {
            h1p + h2p
        } else if (h1p - h2p).abs() <= 180.0 {
            (h1p + h2p) / 2.0
        } else if h1p + h2p < 360.0 {
            (h1p + h2p + 360.0) / 2.0
        } else {
            (h1p + h2p - 360.0) / 2.0
        };

        let t = 1.0 - 0.17 * (h_bar - 30.0).to_radians().cos()
            + 0.24 * (2.0 * h_bar).to_radians().cos()
            + 0.32 * (3.0 * h_bar + 6.0).to_radians().cos()
            - 0.20 * (4.0 * h_bar - 63.0).to_radians().cos();

        let l50 = (l_bar - 50.0).powi(2);
        let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
        let sc = 1.0 + 0.045 * c_bar_p;
        let sh = 1.0 + 0.015 * c_bar_p * t;

        let d_theta = 30.0 * (-((h_bar - 275.0) / 25.0).powi(2)).exp();
        let c_bar_p7 = c_bar_p.powi(7);
        let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
        let rt = -rc * (2.0 * d_theta).to_radians().sin();

        let tl = dl / sl;
        let tc = dc / sc;
        let th = dh / sh;

        // Guard against a tiny negative radicand from rounding
        (tl * tl + tc * tc + th * th + rt * tc * th).max(0.0).sqrt() as f32
    }
}

/// Hue angle in degrees, normalized to 0..360.
fn hue_degrees(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<LinearRgb> for Lab {
    fn from(rgb: LinearRgb) -> Self {
        let [x, y, z] = rgb.to_xyz();

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Srgb> for Lab {
    #[inline]
    fn from(srgb: Srgb) -> Self {
        Lab::from(LinearRgb::from(srgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Selected pairs from Sharma et al. supplementary test data.
    const SHARMA_PAIRS: [([f32; 3], [f32; 3], f32); 7] = [
        ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
        ([50.0, 0.0, 0.0], [50.0, -1.0, 2.0], 2.3669),
        ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
        ([50.0, 2.5, 0.0], [61.0, -5.0, 29.0], 22.8977),
        ([50.0, 2.5, 0.0], [56.0, -27.0, -3.0], 31.9030),
        ([50.0, 2.5, 0.0], [58.0, 24.0, 15.0], 19.4535),
        ([50.0, 2.5, 0.0], [50.0, 3.1736, 0.5854], 1.0000),
    ];

    fn lab(v: [f32; 3]) -> Lab {
        Lab::new(v[0], v[1], v[2])
    }

    #[test]
    fn test_ciede2000_reference_pairs() {
        for (a, b, expected) in SHARMA_PAIRS {
            let d = lab(a).delta_e_2000(lab(b));
            assert!(
                (d - expected).abs() < 1e-3,
                "CIEDE2000 {a:?} vs {b:?}: expected {expected}, got {d}"
            );
        }
    }

    #[test]
    fn test_ciede2000_symmetry_and_identity() {
        for (a, b, _) in SHARMA_PAIRS {
            let d_ab = lab(a).delta_e_2000(lab(b));
            let d_ba = lab(b).delta_e_2000(lab(a));
            assert!((d_ab - d_ba).abs() < 1e-5, "asymmetric: {d_ab} vs {d_ba}");
            assert_eq!(lab(a).delta_e_2000(lab(a)), 0.0);
            assert!(d_ab >= 0.0);
        }
    }

    #[test]
    fn test_known_lab_values() {
        let white = Lab::from(Srgb::from_u8(255, 255, 255));
        assert!((white.l - 100.0).abs() < 0.01, "white L = {}", white.l);
        assert!(white.a.abs() < 0.01 && white.b.abs() < 0.01);

        let black = Lab::from(Srgb::from_u8(0, 0, 0));
        assert!(black.l.abs() < 1e-4);

        // sRGB red is L*53.24 a*80.09 b*67.20
        let red = Lab::from(Srgb::from_u8(255, 0, 0));
        assert!((red.l - 53.24).abs() < 0.05, "red L = {}", red.l);
        assert!((red.a - 80.09).abs() < 0.1, "red a = {}", red.a);
        assert!((red.b - 67.20).abs() < 0.1, "red b = {}", red.b);
    }

    #[test]
    fn test_lab_matches_palette_crate() {
        use palette::{white_point::D65, FromColor, Lab as PaletteLab, Srgb as PaletteSrgb};

        let samples = [
            (255u8, 0u8, 0u8),
            (0, 255, 0),
            (0, 0, 255),
            (128, 128, 128),
            (200, 150, 30),
            (12, 80, 160),
        ];

        for (r, g, b) in samples {
            let ours = Lab::from(Srgb::from_u8(r, g, b));
            let rgb = PaletteSrgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            let theirs: PaletteLab<D65, f32> = PaletteLab::from_color(rgb);
            assert!(
                (ours.l - theirs.l).abs() < 0.05
                    && (ours.a - theirs.a).abs() < 0.05
                    && (ours.b - theirs.b).abs() < 0.05,
                "({r},{g},{b}): ours={ours:?} palette=({}, {}, {})",
                theirs.l,
                theirs.a,
                theirs.b
            );
        }
    }

    #[test]
    fn test_perceptual_not_rgb_distance() {
        // Equal RGB steps are not equal perceptual steps: a blue change is
        // less visible than a green one of the same magnitude.
        let base = Lab::from(Srgb::from_u8(100, 100, 100));
        let greener = Lab::from(Srgb::from_u8(100, 140, 100));
        let bluer = Lab::from(Srgb::from_u8(100, 100, 140));
        assert!(base.delta_e_2000(greener) > base.delta_e_2000(bluer));
    }

    #[test]
    fn test_delta_e_76() {
        let a = Lab::new(50.0, 3.0, 4.0);
        let b = Lab::new(50.0, 0.0, 0.0);
        assert!((a.delta_e_76(b) - 5.0).abs() < 1e-6);
    }
}
