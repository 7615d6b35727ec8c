//! Nearest and randomized flyable-cell queries

use super::{Cell, FlightGrid};
use bevy::prelude::*;
use rand::Rng;

impl FlightGrid {
    /// Chebyshev distance from `cell` to the nearest in-bounds cell; 0 inside the grid
    fn distance_outside(&self, cell: Cell) -> i64 {
        let axis = |value: i32, size: u32| {
            let value = i64::from(value);
            let last = i64::from(size) - 1;
            if value < 0 {
                -value
            } else if value > last {
                value - last
            } else {
                0
            }
        };
        axis(cell.x, self.width()).max(axis(cell.z, self.height()))
    }

    /// `from` itself when flyable, else the first flyable cell on the smallest ring around it.
    ///
    /// Rings are scanned outward up to the configured radius; within a ring `dx` runs from
    /// `-r` to `r` and `dz` likewise for each `dx`. None when nothing flyable is in range.
    pub fn find_nearest_flyable_cell(&self, from: Cell) -> Option<Cell> {
        if self.can_fly_over(from) {
            return Some(from);
        }

        let max_radius = self.settings().nearest_search_radius.get();
        if self.distance_outside(from) > i64::from(max_radius) {
            return None;
        }

        for radius in 1..=max_radius {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    // Perimeter only; inner rings were already scanned
                    if dx.abs() != radius && dz.abs() != radius {
                        continue;
                    }
                    let Some(candidate) = from.checked_offset(dx, dz) else {
                        continue;
                    };
                    if self.can_fly_over(candidate) {
                        return Some(candidate);
                    }
                }
            }
        }

        None
    }

    /// A random flyable cell between `radius / 2` and `radius` cells from `center`.
    ///
    /// Gives up after the configured number of samples and returns `center` unchanged,
    /// which callers treat as a usable (if unmoved) result.
    pub fn random_flyable_cell_near<R: Rng + ?Sized>(
        &self,
        center: Cell,
        radius: f32,
        rng: &mut R,
    ) -> Cell {
        // NaN and infinite radii degrade to the center itself
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let attempts = self.settings().random_attempts.get();

        for _ in 0..attempts {
            let angle = rng.gen_range(0.0f32..360.0).to_radians();
            let distance = rng.gen_range(radius / 2.0..=radius);
            let offset = Vec2::from_angle(angle) * distance;
            let Some(candidate) =
                center.checked_offset(offset.x.round() as i32, offset.y.round() as i32)
            else {
                continue;
            };
            if self.can_fly_over(candidate) {
                return candidate;
            }
        }

        debug!("No flyable cell found near {center} within {radius} after {attempts} attempts");
        center
    }
}
