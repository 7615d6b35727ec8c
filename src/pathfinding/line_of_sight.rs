//! Straight-line visibility and waypoint simplification

use super::{Cell, FlightGrid, FlightPath};

/// Walks the Bresenham line from `from` to `to`, calling `visit` with each cell and the
/// previous one. Stops early when `visit` returns false; returns whether the walk completed.
fn walk_line(from: Cell, to: Cell, mut visit: impl FnMut(Cell, Option<Cell>) -> bool) -> bool {
    // i64 keeps the error term exact across the full i32 coordinate range
    let (x1, z1) = (i64::from(to.x), i64::from(to.z));
    let (mut x, mut z) = (i64::from(from.x), i64::from(from.z));
    let dx = (x1 - x).abs();
    let dz = (z1 - z).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sz = if z < z1 { 1 } else { -1 };
    let mut err = dx - dz;

    let mut previous = None;
    loop {
        // Every visited point lies between the endpoints, so it fits in i32
        let current = Cell::new(x as i32, z as i32);
        if !visit(current, previous) {
            return false;
        }
        if current == to {
            return true;
        }

        previous = Some(current);
        let e2 = 2 * err;
        if e2 > -dz {
            err -= dz;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            z += sz;
        }
    }
}

/// Cells rasterized between `from` and `to`, both inclusive
pub fn line_cells(from: Cell, to: Cell) -> Vec<Cell> {
    let mut cells = Vec::new();
    walk_line(from, to, |cell, _| {
        cells.push(cell);
        true
    });
    cells
}

impl FlightGrid {
    /// True when every rasterized cell between `from` and `to` can be flown over.
    ///
    /// A diagonal step also needs both flanking cells flyable, the same rule A* applies.
    pub fn has_direct_line(&self, from: Cell, to: Cell) -> bool {
        // Endpoints off the grid can never be flown over
        if !self.can_fly_over(from) || !self.can_fly_over(to) {
            return false;
        }
        walk_line(from, to, |cell, previous| {
            if !self.can_fly_over(cell) {
                return false;
            }
            match previous {
                Some(prev) if prev.is_diagonal_to(&cell) => {
                    self.can_fly_over(Cell::new(cell.x, prev.z))
                        && self.can_fly_over(Cell::new(prev.x, cell.z))
                }
                _ => true,
            }
        })
    }

    /// Drop every waypoint that a straight flyable line can skip.
    ///
    /// From each anchor, the furthest remaining waypoint with a direct line becomes the
    /// next anchor.
    pub fn simplify_path(&self, path: FlightPath) -> FlightPath {
        let cells = path.into_cells();
        if cells.len() <= 2 {
            return FlightPath::new(cells);
        }

        let mut simplified = Vec::with_capacity(cells.len());
        simplified.push(cells[0]);

        let mut anchor = 0;
        let last = cells.len() - 1;
        while anchor < last {
            let next = (anchor + 1..=last)
                .rev()
                .find(|&candidate| self.has_direct_line(cells[anchor], cells[candidate]))
                // Adjacent grid steps are always flyable
                .unwrap_or(anchor + 1);
            simplified.push(cells[next]);
            anchor = next;
        }

        FlightPath::new(simplified)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_line_cells_endpoints_and_continuity() {
        let cells = line_cells(Cell::new(0, 0), Cell::new(7, 3));
        assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(7, 3)));
        for pair in cells.windows(2) {
            assert!(pair[0].is_adjacent_to(&pair[1]));
        }
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_line_cells_single_point_and_reverse() {
        assert_eq!(line_cells(Cell::new(2, 2), Cell::new(2, 2)), vec![Cell::new(2, 2)]);
        let back = line_cells(Cell::new(5, 1), Cell::new(0, 4));
        assert_eq!(back.first(), Some(&Cell::new(5, 1)));
        assert_eq!(back.last(), Some(&Cell::new(0, 4)));
    }

    #[test]
    fn test_direct_line_blocked_by_wall() {
        let grid = wall_with_gap();
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(9, 0)));
        assert!(grid.has_direct_line(Cell::new(0, 5), Cell::new(9, 5)));
        // The diagonal through the gap clips the wall at (5, 4)
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(9, 9)));
        assert!(grid.has_direct_line(Cell::new(0, 0), Cell::new(4, 9)));
    }

    #[test]
    fn test_direct_line_out_of_bounds() {
        let grid = FlightGrid::new(5, 5);
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(5, 0)));
        assert!(!grid.has_direct_line(Cell::new(-1, 0), Cell::new(3, 0)));
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(i32::MAX, 0)));
        assert!(!grid.has_direct_line(Cell::new(i32::MIN, i32::MIN), Cell::new(2, 2)));
    }

    #[test]
    fn test_line_cells_at_coordinate_extremes() {
        let top = Cell::new(i32::MAX, i32::MAX);
        let cells = line_cells(Cell::new(i32::MAX - 3, i32::MAX - 1), top);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells.last(), Some(&top));

        let bottom = Cell::new(i32::MIN, i32::MIN);
        assert_eq!(line_cells(Cell::new(i32::MIN + 2, i32::MIN), bottom).len(), 3);
    }

    #[test]
    fn test_direct_line_rejects_pinched_diagonal() {
        let grid = grid_from_layout(
            "
            .#.
            #..
            ...
            ",
        );
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(1, 1)));
        assert!(!grid.has_direct_line(Cell::new(0, 0), Cell::new(2, 2)));
        // One open flank is not enough
        assert!(!grid.has_direct_line(Cell::new(1, 1), Cell::new(2, 0)));
        assert!(grid.has_direct_line(Cell::new(1, 1), Cell::new(2, 2)));
    }

    #[test]
    fn test_simplify_short_paths_unchanged() {
        let grid = FlightGrid::new(4, 4);
        let two = FlightPath::new(vec![Cell::new(0, 0), Cell::new(3, 3)]);
        assert_eq!(grid.simplify_path(two.clone()), two);
        let one = FlightPath::new(vec![Cell::new(1, 1)]);
        assert_eq!(grid.simplify_path(one.clone()), one);
    }

    #[test]
    fn test_simplify_straight_run() {
        let grid = FlightGrid::new(8, 8);
        let path = FlightPath::new((0..8).map(|x| Cell::new(x, 2)).collect());
        assert_eq!(
            grid.simplify_path(path).cells(),
            &[Cell::new(0, 2), Cell::new(7, 2)]
        );
    }

    #[test]
    fn test_simplify_keeps_corner_around_obstacle() {
        let grid = grid_from_layout(
            "
            .....
            .###.
            .###.
            .....
            ",
        );
        let raw = grid.find_raw_path(Cell::new(0, 1), Cell::new(4, 1)).unwrap();
        let simplified = grid.simplify_path(raw.clone());

        assert!(simplified.len() <= raw.len());
        assert!(simplified.len() >= 3, "must bend around the block");
        assert_eq!(simplified.first(), raw.first());
        assert_eq!(simplified.last(), raw.last());
        for pair in simplified.cells().windows(2) {
            assert!(grid.has_direct_line(pair[0], pair[1]));
        }
    }
}
