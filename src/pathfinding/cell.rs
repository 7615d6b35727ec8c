//! Grid cell coordinates

use derive_more::{Add, AddAssign, Display, Sub};
use serde::{Deserialize, Serialize};

/// Cost of one orthogonal grid step
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of one diagonal grid step
pub const DIAGONAL_COST: f64 = 1.414;

/// A cell coordinate on the flight grid.
///
/// Coordinates are signed so callers can describe positions past the map edge; the grid
/// treats those as blocked and never indexes them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Add,
    Sub,
    AddAssign,
    Display,
    Serialize,
    Deserialize,
)]
#[display("({x}, {z})")]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance in cells
    pub fn distance(&self, other: &Cell) -> f32 {
        let dx = self.x.abs_diff(other.x) as f32;
        let dz = self.z.abs_diff(other.z) as f32;
        dx.hypot(dz)
    }

    /// `self` shifted by `(dx, dz)`, or None when the result leaves the `i32` range
    pub fn checked_offset(&self, dx: i32, dz: i32) -> Option<Cell> {
        Some(Cell::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?))
    }

    /// Octile distance under the grid's step costs.
    ///
    /// Uses `DIAGONAL_COST - 1` as the min-axis factor, so the estimate never exceeds the
    /// true step cost and stays consistent across neighbours.
    pub fn octile_distance(&self, other: &Cell) -> f64 {
        let dx = self.x.abs_diff(other.x) as f64;
        let dz = self.z.abs_diff(other.z) as f64;
        dx.max(dz) + (DIAGONAL_COST - ORTHOGONAL_COST) * dx.min(dz)
    }

    /// True when `other` is exactly one diagonal step away
    pub fn is_diagonal_to(&self, other: &Cell) -> bool {
        self.x.abs_diff(other.x) == 1 && self.z.abs_diff(other.z) == 1
    }

    /// True when `other` is one orthogonal or diagonal step away
    pub fn is_adjacent_to(&self, other: &Cell) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        dx <= 1 && dz <= 1 && (dx + dz) > 0
    }

    /// Cost of a single step from `self` to an adjacent `other`
    pub fn step_cost(&self, other: &Cell) -> f64 {
        if self.is_diagonal_to(other) {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}
