//! A* search over the 8-connected flight grid

use super::{Cell, FlightGrid};
use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Direction offsets for 8-directional movement, scanned in this order
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),   // East
    (1, 1),   // Southeast
    (0, 1),   // South
    (-1, 1),  // Southwest
    (-1, 0),  // West
    (-1, -1), // Northwest
    (0, -1),  // North
    (1, -1),  // Northeast
];

/// Ordered waypoints from start to destination, inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightPath(Vec<Cell>);

impl FlightPath {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.0.iter()
    }

    /// Total travel cost: grid step costs for adjacent waypoints, straight-line length otherwise
    pub fn step_cost(&self) -> f64 {
        self.0
            .windows(2)
            .map(|pair| {
                if pair[0].is_adjacent_to(&pair[1]) {
                    pair[0].step_cost(&pair[1])
                } else {
                    pair[0].distance(&pair[1]) as f64
                }
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a FlightPath {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<FlightPath> for Vec<Cell> {
    fn from(path: FlightPath) -> Self {
        path.0
    }
}

/// A frontier entry: cheapest f-score first, then earliest sequence number
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f_score: f64,
    sequence: u64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so compare reversed to pop the minimum
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-query search state; dropped when the query returns
struct SearchState {
    g_score: Vec<f64>,
    came_from: Vec<Option<usize>>,
    closed: Vec<bool>,
    sequence: Vec<Option<u64>>,
    next_sequence: u64,
    frontier: BinaryHeap<FrontierEntry>,
}

impl SearchState {
    fn new(cell_count: usize) -> Self {
        Self {
            g_score: vec![f64::INFINITY; cell_count],
            came_from: vec![None; cell_count],
            closed: vec![false; cell_count],
            sequence: vec![None; cell_count],
            next_sequence: 0,
            frontier: BinaryHeap::new(),
        }
    }

    /// Push `index` with `f_score`, keeping the sequence number from its first entry
    fn push(&mut self, index: usize, f_score: f64) {
        let sequence = *self.sequence[index].get_or_insert_with(|| {
            let next = self.next_sequence;
            self.next_sequence += 1;
            next
        });
        self.frontier.push(FrontierEntry {
            f_score,
            sequence,
            index,
        });
    }

    fn reconstruct(&self, grid: &FlightGrid, goal: usize) -> Vec<Cell> {
        let mut path = vec![grid.cell_at(goal)];
        let mut current = goal;
        while let Some(previous) = self.came_from[current] {
            path.push(grid.cell_at(previous));
            current = previous;
        }
        path.reverse();
        path
    }
}

impl FlightGrid {
    /// Check if a diagonal move keeps clear of blocked corners
    fn is_step_allowed(&self, from: Cell, dx: i32, dz: i32) -> bool {
        if dx == 0 || dz == 0 {
            return true;
        }
        self.can_fly_over(Cell::new(from.x + dx, from.z))
            && self.can_fly_over(Cell::new(from.x, from.z + dz))
    }

    /// Find a flyable route from `start` to `destination`.
    ///
    /// A blocked `start` is first moved to the nearest flyable cell. Short hops with a clear
    /// line skip the search entirely. The returned path is simplified.
    pub fn find_path(&self, start: Cell, destination: Cell) -> Option<FlightPath> {
        if !self.can_fly_over(destination) {
            debug!("Flight path {start} -> {destination}: destination is not flyable");
            return None;
        }

        let start = if self.can_fly_over(start) {
            start
        } else {
            let Some(resolved) = self.find_nearest_flyable_cell(start) else {
                debug!("Flight path {start} -> {destination}: no flyable cell near start");
                return None;
            };
            debug!("Flight path start {start} is blocked, using {resolved}");
            resolved
        };

        if start == destination {
            return Some(FlightPath::new(vec![start]));
        }

        if start.distance(&destination) < self.settings().fast_path_distance.get()
            && self.has_direct_line(start, destination)
        {
            return Some(FlightPath::new(vec![start, destination]));
        }

        let raw = self.find_raw_path(start, destination)?;
        let raw_len = raw.len();
        let simplified = self.simplify_path(raw);
        debug!(
            "Flight path {start} -> {destination}: raw_path={raw_len} cells, simplified_path={} waypoints",
            simplified.len()
        );
        Some(simplified)
    }

    /// A* over single grid steps, without start relocation, fast path or simplification
    pub fn find_raw_path(&self, start: Cell, destination: Cell) -> Option<FlightPath> {
        let start_index = self.index_of(start)?;
        let goal_index = self.index_of(destination)?;
        if !self.can_fly_over(start) || !self.can_fly_over(destination) {
            return None;
        }

        let expansion_limit = self.settings().max_expansions.resolve(self.cell_count());
        let mut state = SearchState::new(self.cell_count());
        state.g_score[start_index] = 0.0;
        state.push(start_index, start.octile_distance(&destination));

        let mut expansions = 0usize;
        while let Some(entry) = state.frontier.pop() {
            if state.closed[entry.index] {
                continue;
            }

            if entry.index == goal_index {
                debug!("A* reached {destination} after {expansions} expansions");
                return Some(FlightPath::new(state.reconstruct(self, goal_index)));
            }

            expansions += 1;
            if expansions > expansion_limit {
                warn!(
                    "A* from {start} to {destination} hit the expansion cap ({expansion_limit})"
                );
                return None;
            }

            state.closed[entry.index] = true;
            let current = self.cell_at(entry.index);
            let current_g = state.g_score[entry.index];

            for &(dx, dz) in &DIRECTIONS {
                let neighbor = Cell::new(current.x + dx, current.z + dz);
                let Some(neighbor_index) = self.index_of(neighbor) else {
                    continue;
                };
                if state.closed[neighbor_index] || !self.flyable[neighbor_index] {
                    continue;
                }
                if !self.is_step_allowed(current, dx, dz) {
                    continue;
                }

                let tentative_g = current_g + current.step_cost(&neighbor);
                if tentative_g < state.g_score[neighbor_index] {
                    state.came_from[neighbor_index] = Some(entry.index);
                    state.g_score[neighbor_index] = tentative_g;
                    state.push(
                        neighbor_index,
                        tentative_g + neighbor.octile_distance(&destination),
                    );
                }
            }
        }

        debug!("A* from {start} to {destination}: frontier exhausted after {expansions} expansions");
        None
    }
}
