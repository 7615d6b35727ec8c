use crate::errors::{FlightError, FlightResult};
use crate::terrain::{Roof, Structure, TerrainCell, TerrainMap};
use noise::{MultiFractal, NoiseFn, Perlin, RidgedMulti};

/// Ridged-noise mountain ranges: high ground gets a thick rock roof and its core is solid rock
#[derive(Debug, Clone)]
pub struct MountainGenerator {
    pub seed: u32,
    pub frequency: f64,
    pub octaves: usize,
    /// Normalized height above which a cell is roofed by thick rock
    pub roof_threshold: f64,
    /// Normalized height above which a cell is unmined natural rock
    pub core_threshold: f64,
}

impl MountainGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            frequency: 0.04,
            octaves: 4,
            roof_threshold: 0.72,
            core_threshold: 0.8,
        }
    }

    /// Generate a terrain map; identical seeds give identical maps
    pub fn generate(&self, width: u32, height: u32) -> FlightResult<TerrainMap> {
        if self.core_threshold < self.roof_threshold {
            return Err(FlightError::InvalidMapData {
                reason: format!(
                    "core threshold {} must not be below roof threshold {}",
                    self.core_threshold, self.roof_threshold
                ),
            });
        }

        let ridged = RidgedMulti::<Perlin>::new(self.seed)
            .set_octaves(self.octaves)
            .set_frequency(self.frequency);

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for z in 0..height {
            for x in 0..width {
                // Ridged output is roughly [-1, 1]
                let elevation = ((ridged.get([x as f64, z as f64]) + 1.0) / 2.0).clamp(0.0, 1.0);
                let mut cell = TerrainCell::OPEN;
                if elevation >= self.roof_threshold {
                    cell.roof = Roof::ThickRock;
                }
                if elevation >= self.core_threshold {
                    cell.structure = Structure::NaturalRock { smoothed: false };
                }
                cells.push(cell);
            }
        }

        TerrainMap::new(width, height, cells)
    }
}

/// Get a predefined generator preset
pub fn get_terrain_preset(name: &str, seed: Option<u32>) -> Option<MountainGenerator> {
    let seed = seed.unwrap_or_else(rand::random);
    let base = MountainGenerator::new(seed);

    match name {
        // Thresholds above the noise range leave the sky open
        "open" => Some(MountainGenerator {
            roof_threshold: 2.0,
            core_threshold: 2.0,
            ..base
        }),
        "hills" => Some(MountainGenerator {
            roof_threshold: 0.85,
            core_threshold: 0.92,
            ..base
        }),
        "mountains" => Some(base),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::{Cell, FlightGrid};

    #[test]
    fn test_generation_is_deterministic() {
        let generator = MountainGenerator::new(12345);
        let a = generator.generate(32, 24).unwrap();
        let b = generator.generate(32, 24).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 32);
        assert_eq!(a.height(), 24);
    }

    #[test]
    fn test_open_preset_has_no_blocked_cells() {
        let generator = get_terrain_preset("open", Some(9)).unwrap();
        let terrain = generator.generate(16, 16).unwrap();
        let grid = FlightGrid::from_terrain_map(&terrain);
        assert_eq!(grid.blocked_count(), 0);
    }

    #[test]
    fn test_rock_core_is_always_roofed() {
        let terrain = MountainGenerator::new(77).generate(48, 48).unwrap();
        for cell in terrain.cells() {
            if matches!(cell.structure, Structure::NaturalRock { .. }) {
                assert_eq!(cell.roof, Roof::ThickRock);
            }
        }
    }

    #[test]
    fn test_blocked_cells_match_mountains() {
        let generator = MountainGenerator {
            roof_threshold: 0.0,
            core_threshold: 0.0,
            ..MountainGenerator::new(1)
        };
        let terrain = generator.generate(8, 8).unwrap();
        let grid = FlightGrid::from_terrain_map(&terrain);
        assert_eq!(grid.blocked_count(), 64);
        assert!(grid.find_path(Cell::new(0, 0), Cell::new(7, 7)).is_none());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let generator = MountainGenerator {
            roof_threshold: 0.9,
            core_threshold: 0.5,
            ..MountainGenerator::new(3)
        };
        assert!(generator.generate(4, 4).is_err());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(get_terrain_preset("volcano", Some(1)).is_none());
        assert!(get_terrain_preset("mountains", None).is_some());
    }
}
