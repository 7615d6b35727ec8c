//! Terrain source consulted when the flight grid is rebuilt or updated

use crate::errors::{FlightError, FlightResult};
use crate::pathfinding::Cell;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Classifies a single cell as flyable or blocked.
///
/// Evaluated once per cell during rebuild/update; the grid keeps only the boolean result.
pub trait PassabilityRule {
    fn is_flyable(&self, cell: Cell) -> bool;
}

impl<F> PassabilityRule for F
where
    F: Fn(Cell) -> bool,
{
    fn is_flyable(&self, cell: Cell) -> bool {
        self(cell)
    }
}

/// Roof covering a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Roof {
    #[default]
    None,
    Constructed,
    ThinRock,
    /// Overhead mountain rock; nothing flies through it
    ThickRock,
}

/// What stands on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Structure {
    #[default]
    None,
    Building,
    NaturalRock { smoothed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerrainCell {
    pub roof: Roof,
    pub structure: Structure,
    pub water: bool,
}

impl TerrainCell {
    pub const OPEN: TerrainCell = TerrainCell {
        roof: Roof::None,
        structure: Structure::None,
        water: false,
    };

    /// Fliers ignore ground clutter and water; only mountain mass stops them
    pub fn is_flyable(&self) -> bool {
        if self.roof == Roof::ThickRock {
            return false;
        }
        !matches!(self.structure, Structure::NaturalRock { smoothed: false })
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        let mut cell = Self::OPEN;
        match glyph {
            '.' => {}
            '~' => cell.water = true,
            '^' => cell.roof = Roof::ThinRock,
            '+' => cell.roof = Roof::Constructed,
            'B' => {
                cell.roof = Roof::Constructed;
                cell.structure = Structure::Building;
            }
            '#' => cell.roof = Roof::ThickRock,
            'R' => {
                cell.roof = Roof::ThickRock;
                cell.structure = Structure::NaturalRock { smoothed: false };
            }
            'r' => cell.structure = Structure::NaturalRock { smoothed: true },
            _ => return None,
        }
        Some(cell)
    }

    fn glyph(&self) -> char {
        match (self.structure, self.roof) {
            (Structure::NaturalRock { smoothed: false }, _) => 'R',
            (Structure::NaturalRock { smoothed: true }, _) => 'r',
            (Structure::Building, _) => 'B',
            (Structure::None, Roof::ThickRock) => '#',
            (Structure::None, Roof::ThinRock) => '^',
            (Structure::None, Roof::Constructed) => '+',
            (Structure::None, Roof::None) if self.water => '~',
            (Structure::None, Roof::None) => '.',
        }
    }
}

/// Dense per-cell terrain description, row-major by `z * width + x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Resource)]
pub struct TerrainMap {
    #[validate(range(min = 1, max = 2048))]
    width: u32,
    #[validate(range(min = 1, max = 2048))]
    height: u32,
    cells: Vec<TerrainCell>,
}

impl TerrainMap {
    /// Create a new terrain map with validation
    pub fn new(width: u32, height: u32, cells: Vec<TerrainCell>) -> FlightResult<Self> {
        let expected_size = (width as usize) * (height as usize);
        if cells.len() != expected_size {
            return Err(FlightError::InvalidMapData {
                reason: format!(
                    "Cell array size {} does not match terrain dimensions {}x{} (expected {})",
                    cells.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }

        let map = Self {
            width,
            height,
            cells,
        };
        map.check()?;
        Ok(map)
    }

    /// Open sky everywhere
    pub fn open(width: u32, height: u32) -> FlightResult<Self> {
        let cells = vec![TerrainCell::OPEN; (width as usize) * (height as usize)];
        Self::new(width, height, cells)
    }

    /// Parse a glyph layout; the first line is row `z = 0`.
    ///
    /// `.` open, `~` water, `^` thin rock roof, `+` constructed roof, `B` building,
    /// `#` thick rock roof, `R` unsmoothed natural rock, `r` smoothed natural rock.
    pub fn from_ascii(layout: &str) -> FlightResult<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(FlightError::InvalidMapData {
                reason: "Layout has no rows".to_string(),
            });
        };
        let width = first.chars().count();

        let mut cells = Vec::with_capacity(width * rows.len());
        for (z, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(FlightError::InvalidMapData {
                    reason: format!(
                        "Row {z} has {} cells, expected {width}",
                        row.chars().count()
                    ),
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let cell =
                    TerrainCell::from_glyph(glyph).ok_or_else(|| FlightError::InvalidMapData {
                        reason: format!("Unknown terrain glyph '{glyph}' at ({x}, {z})"),
                    })?;
                cells.push(cell);
            }
        }

        Self::new(width as u32, rows.len() as u32, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.cells.chunks(self.width as usize) {
            out.extend(row.iter().map(TerrainCell::glyph));
            out.push('\n');
        }
        out
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.z < 0 || cell.x >= self.width as i32 || cell.z >= self.height as i32
        {
            return None;
        }
        Some(cell.z as usize * self.width as usize + cell.x as usize)
    }

    pub fn cell(&self, cell: Cell) -> Option<&TerrainCell> {
        self.index(cell).map(|index| &self.cells[index])
    }

    /// Replace one cell; returns false when `cell` is outside the map
    pub fn set_cell(&mut self, cell: Cell, terrain: TerrainCell) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = terrain;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }

    fn check(&self) -> FlightResult<()> {
        self.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            FlightError::MapValidationFailed {
                reason: format!("Terrain validation failed: {error_details}"),
            }
        })?;

        if self.cells.len() != (self.width as usize) * (self.height as usize) {
            return Err(FlightError::CorruptedMapFile {
                reason: "Cell count does not match dimensions".to_string(),
            });
        }
        Ok(())
    }

    /// Get the maps directory path
    pub fn get_maps_dir() -> FlightResult<PathBuf> {
        Ok(std::env::current_dir()?.join("maps"))
    }

    /// Load a terrain map from the maps directory
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> FlightResult<Self> {
        Self::load_from_path(Self::get_maps_dir()?.join(filename))
    }

    /// Save the terrain map to the maps directory
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> FlightResult<PathBuf> {
        let file_path = Self::get_maps_dir()?.join(filename);
        self.save_to_path(&file_path)?;
        Ok(file_path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> FlightResult<Self> {
        let file_path = path.as_ref();
        if !file_path.exists() {
            return Err(FlightError::MapFileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        let data = std::fs::read(file_path)?;
        let (map, _): (TerrainMap, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                FlightError::CorruptedMapFile {
                    reason: format!("Failed to deserialize terrain data: {e}"),
                }
            })?;

        map.check()?;
        info!(
            "Loaded {}x{} terrain from {}",
            map.width,
            map.height,
            file_path.display()
        );
        Ok(map)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> FlightResult<()> {
        self.check()?;

        let file_path = path.as_ref();
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data =
            bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
                FlightError::InvalidMapData {
                    reason: format!("Failed to serialize terrain: {e}"),
                }
            })?;

        std::fs::write(file_path, data)?;
        Ok(())
    }
}

impl PassabilityRule for TerrainMap {
    fn is_flyable(&self, cell: Cell) -> bool {
        self.cell(cell).is_some_and(TerrainCell::is_flyable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flyability_rules() {
        let mut cell = TerrainCell::OPEN;
        assert!(cell.is_flyable());

        cell.water = true;
        assert!(cell.is_flyable(), "water is flown over");

        cell.roof = Roof::Constructed;
        cell.structure = Structure::Building;
        assert!(cell.is_flyable(), "fliers ignore buildings");

        cell.roof = Roof::ThinRock;
        cell.structure = Structure::NaturalRock { smoothed: true };
        assert!(cell.is_flyable(), "smoothed rock under a thin roof is flyable");

        cell.structure = Structure::NaturalRock { smoothed: false };
        assert!(!cell.is_flyable());

        cell.structure = Structure::None;
        cell.roof = Roof::ThickRock;
        assert!(!cell.is_flyable());
    }

    #[test]
    fn test_ascii_layout() {
        let map = TerrainMap::from_ascii(
            "
            ..#
            ~Rr
            ",
        )
        .unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        assert!(map.is_flyable(Cell::new(0, 0)));
        assert!(!map.is_flyable(Cell::new(2, 0)));
        assert!(map.is_flyable(Cell::new(0, 1)));
        assert!(!map.is_flyable(Cell::new(1, 1)));
        assert!(map.is_flyable(Cell::new(2, 1)));
        assert_eq!(map.to_ascii(), "..#\n~Rr\n");
    }

    #[test]
    fn test_ascii_rejects_ragged_rows_and_unknown_glyphs() {
        assert!(TerrainMap::from_ascii("...\n..").is_err());
        assert!(TerrainMap::from_ascii("..x").is_err());
        assert!(TerrainMap::from_ascii("   \n").is_err());
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let map = TerrainMap::open(4, 4).unwrap();
        assert!(!map.is_flyable(Cell::new(-1, 0)));
        assert!(!map.is_flyable(Cell::new(0, 4)));
        assert!(map.cell(Cell::new(4, 0)).is_none());
    }

    #[test]
    fn test_terrain_invalid_size() {
        assert!(TerrainMap::new(2, 2, vec![TerrainCell::OPEN; 3]).is_err());
        assert!(matches!(
            TerrainMap::open(0, 5),
            Err(FlightError::MapValidationFailed { .. })
        ));
    }

    #[test]
    fn test_set_cell() {
        let mut map = TerrainMap::open(3, 3).unwrap();
        let rock = TerrainCell {
            roof: Roof::ThickRock,
            ..TerrainCell::OPEN
        };
        assert!(map.set_cell(Cell::new(1, 1), rock));
        assert!(!map.set_cell(Cell::new(3, 1), rock));
        assert!(!map.is_flyable(Cell::new(1, 1)));
    }

    #[test]
    fn test_closure_rule() {
        let rule = |cell: Cell| cell.x != 2;
        assert!(rule.is_flyable(Cell::new(1, 0)));
        assert!(!rule.is_flyable(Cell::new(2, 0)));
    }

    #[test]
    fn test_save_and_load_path() {
        let map = TerrainMap::from_ascii("#..\n.R.\n..~").unwrap();
        let path = std::env::temp_dir()
            .join(format!("flight_grid_test_{}", std::process::id()))
            .join("terrain.bin");

        map.save_to_path(&path).unwrap();
        let loaded = TerrainMap::load_from_path(&path).unwrap();
        assert_eq!(loaded, map);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TerrainMap::load_from_path("/no/such/dir/terrain.bin");
        assert!(matches!(result, Err(FlightError::MapFileNotFound { .. })));
    }
}
