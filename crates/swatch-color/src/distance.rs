//! Perceptual distance metrics

use crate::color::Lab;

/// Metric used to compare two [`Lab`] colors.
///
/// Both metrics are symmetric, non-negative and zero for identical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// CIEDE2000 (Sharma et al., 2005). Compensates for the non-uniformity
    /// of L*a*b* in the blues and near the neutral axis.
    #[default]
    Ciede2000,

    /// CIE76: plain Euclidean distance in L*a*b*.
    Cie76,
}

impl DistanceMetric {
    /// Distance between two colors under this metric.
    ///
    /// ```
    /// use swatch_color::{DistanceMetric, Lab, Srgb};
    ///
    /// let red = Lab::from(Srgb::from_u8(255, 0, 0));
    /// let crimson = Lab::from(Srgb::from_u8(220, 20, 60));
    /// let d = DistanceMetric::Ciede2000.distance(red, crimson);
    /// assert!(d > 0.0);
    /// assert_eq!(d, DistanceMetric::Ciede2000.distance(crimson, red));
    /// ```
    #[inline]
    pub fn distance(self, a: Lab, b: Lab) -> f32 {
        match self {
            DistanceMetric::Ciede2000 => a.delta_e_2000(b),
            DistanceMetric::Cie76 => a.delta_e_76(b),
        }
    }

    /// Index and distance of the entry in `candidates` nearest to `target`.
    ///
    /// Linear scan; ties keep the earliest candidate. `None` for an empty
    /// slice.
    pub fn nearest<I>(self, target: Lab, candidates: I) -> Option<(usize, f32)>
    where
        I: IntoIterator<Item = Lab>,
    {
        let mut best: Option<(usize, f32)> = None;
        for (i, candidate) in candidates.into_iter().enumerate() {
            let d = self.distance(target, candidate);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }
        best
    }
}
