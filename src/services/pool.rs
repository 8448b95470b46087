use swatch_color::{DistanceMetric, Lab};

use crate::models::Swatch;

/// An owned supply of swatches consumed without replacement.
///
/// Each run gets its own pool; claiming removes the entry, so a pool must
/// not be shared between concurrent runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T: Swatch> Pool<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Remove and return the entry perceptually closest to `target`.
    ///
    /// Linear scan over what is left. On equal distances the earliest
    /// remaining entry wins, and removal keeps the order of the rest, so
    /// repeated runs over the same input claim the same entries.
    pub fn claim_nearest(&mut self, target: Lab, metric: DistanceMetric) -> Option<(T, f32)> {
        let labs = self.items.iter().map(|item| item.lab());
        let (index, distance) = metric.nearest(target, labs)?;
        Some((self.items.remove(index), distance))
    }
}

impl<T: Swatch> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
