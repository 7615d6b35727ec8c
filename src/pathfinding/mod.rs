use crate::resources::FlightSettings;
use crate::terrain::{PassabilityRule, TerrainMap};
use bevy::prelude::*;

pub mod cell;
pub mod line_of_sight;
pub mod nearby;
pub mod search;

pub use cell::*;
pub use line_of_sight::line_cells;
pub use search::FlightPath;

/// Flyable/blocked classification for every cell of a map
#[derive(Debug, Clone, Resource)]
pub struct FlightGrid {
    /// Flyability map - true if the cell can be flown over
    flyable: Vec<bool>,
    /// Grid dimensions
    width: u32,
    height: u32,
    settings: FlightSettings,
}

impl FlightGrid {
    /// A grid of the given size with every cell flyable
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            flyable: vec![true; width as usize * height as usize],
            width,
            height,
            settings: FlightSettings::default(),
        }
    }

    /// Build a grid sized to the map and classify every cell with `rule`
    pub fn from_terrain(rule: &impl PassabilityRule, width: u32, height: u32) -> Self {
        let mut grid = Self::new(width, height);
        grid.rebuild(rule);
        grid
    }

    pub fn from_terrain_map(terrain: &TerrainMap) -> Self {
        Self::from_terrain(terrain, terrain.width(), terrain.height())
    }

    pub fn with_settings(mut self, settings: FlightSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &FlightSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: FlightSettings) {
        self.settings = settings;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.flyable.len()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.z >= 0 && cell.x < self.width as i32 && cell.z < self.height as i32
    }

    /// Row-major index of `cell`, or None when it lies outside the grid
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(cell.z as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of `index_of` for indices below `cell_count()`
    pub fn cell_at(&self, index: usize) -> Cell {
        let width = self.width as usize;
        Cell::new((index % width) as i32, (index / width) as i32)
    }

    /// Re-evaluate every cell against the terrain
    pub fn rebuild(&mut self, rule: &impl PassabilityRule) {
        for index in 0..self.flyable.len() {
            let cell = self.cell_at(index);
            self.flyable[index] = rule.is_flyable(cell);
        }

        let blocked = self.blocked_count();
        let total = self.cell_count();
        info!(
            "Flight grid rebuilt: {blocked}/{total} cells blocked ({percentage:.1}%)",
            percentage = if total == 0 {
                0.0
            } else {
                blocked as f32 / total as f32 * 100.0
            }
        );
    }

    /// Re-evaluate one cell. Returns true when its classification changed.
    pub fn update_cell(&mut self, rule: &impl PassabilityRule, cell: Cell) -> bool {
        let Some(index) = self.index_of(cell) else {
            return false;
        };

        let flyable = rule.is_flyable(cell);
        let changed = self.flyable[index] != flyable;
        self.flyable[index] = flyable;
        if changed {
            debug!("Flight grid cell {cell} is now flyable={flyable}");
        }
        changed
    }

    /// False for anything outside the grid
    pub fn can_fly_over(&self, cell: Cell) -> bool {
        self.index_of(cell)
            .map(|index| self.flyable[index])
            .unwrap_or(false)
    }

    pub fn can_fly_over_xz(&self, x: i32, z: i32) -> bool {
        self.can_fly_over(Cell::new(x, z))
    }

    pub fn blocked_count(&self) -> usize {
        self.flyable.iter().filter(|&&f| !f).count()
    }

    /// Render the grid as text, marking `path` cells with `*`
    pub fn render(&self, path: &[Cell]) -> String {
        let mut out = String::with_capacity(self.flyable.len() + self.height as usize);
        for z in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let cell = Cell::new(x, z);
                let glyph = if path.contains(&cell) {
                    '*'
                } else if self.can_fly_over(cell) {
                    '.'
                } else {
                    '#'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Test helpers shared by the pathfinding submodules
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Grid from a glyph layout where `#` is blocked and anything else is flyable
    pub fn grid_from_layout(layout: &str) -> FlightGrid {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let rule = |cell: Cell| rows[cell.z as usize].as_bytes()[cell.x as usize] != b'#';
        FlightGrid::from_terrain(&rule, width, height)
    }

    /// 10x10 open grid with a wall at x=5 broken only at z=5
    pub fn wall_with_gap() -> FlightGrid {
        let rule = |cell: Cell| cell.x != 5 || cell.z == 5;
        FlightGrid::from_terrain(&rule, 10, 10)
    }
}
