use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Straight-line distance (in cells) below which a path query may skip A*, constrained to [0.0, 64.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct FastPathDistance(f32);

impl FastPathDistance {
    const MIN: f32 = 0.0;
    const MAX: f32 = 64.0;
    const DEFAULT: Self = Self(5.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for FastPathDistance {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for FastPathDistance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Ring radius (in cells) for the nearest-flyable-cell search, constrained to [0, 64]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "i32")]
pub struct SearchRadius(i32);

impl SearchRadius {
    const MIN: i32 = 0;
    const MAX: i32 = 64;

    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for SearchRadius {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Sample budget for randomized nearby-cell queries, constrained to [1, 1000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct AttemptBudget(u32);

impl AttemptBudget {
    const MIN: u32 = 1;
    const MAX: u32 = 1000;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for AttemptBudget {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self::new(20)
    }
}

/// A* expansion cap. Zero means "one expansion per grid cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Display, From, Serialize, Deserialize)]
pub struct ExpansionLimit(usize);

impl ExpansionLimit {
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    /// Resolve the cap for a grid with `cell_count` cells
    pub fn resolve(self, cell_count: usize) -> usize {
        if self.0 == 0 { cell_count } else { self.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_clamping() {
        assert_eq!(FastPathDistance::new(-3.0).get(), 0.0);
        assert_eq!(FastPathDistance::new(500.0).get(), 64.0);
        assert_eq!(SearchRadius::new(-1).get(), 0);
        assert_eq!(SearchRadius::new(99).get(), 64);
        assert_eq!(AttemptBudget::new(0).get(), 1);
        assert_eq!(FastPathDistance::new(f32::NAN).get(), 5.0);
        assert_eq!(AttemptBudget::from(5000).get(), 1000);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FastPathDistance::default().get(), 5.0);
        assert_eq!(SearchRadius::default().get(), 10);
        assert_eq!(AttemptBudget::default().get(), 20);
        assert_eq!(ExpansionLimit::default().resolve(100), 100);
        assert_eq!(ExpansionLimit::new(7).resolve(100), 7);
    }
}
