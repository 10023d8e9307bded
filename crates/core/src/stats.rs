//! Min / average / max triples.

use serde::{Deserialize, Serialize};

/// An immutable (min, average, max) triple.
///
/// When all three values are derived from the same data, `min <= average <= max`.
/// Independently supplied triples (velocity overrides) are taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsTriple<T> {
    /// Lowest value
    pub min: T,
    /// Central value
    pub average: T,
    /// Highest value
    pub max: T,
}

impl<T> StatsTriple<T> {
    /// Create a triple.
    pub fn new(min: T, average: T, max: T) -> Self {
        Self { min, average, max }
    }

    /// Apply `f` to each component.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> StatsTriple<U> {
        StatsTriple {
            min: f(self.min),
            average: f(self.average),
            max: f(self.max),
        }
    }
}

impl<T: PartialOrd> StatsTriple<T> {
    /// Whether `min <= average <= max` holds.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.average && self.average <= self.max
    }
}

impl StatsTriple<f64> {
    /// All three components are zero: no velocity signal.
    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.average == 0.0 && self.max == 0.0
    }
}
