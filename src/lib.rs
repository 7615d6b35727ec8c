pub mod components;
pub mod config;
pub mod errors;
pub mod pathfinding;
pub mod plugins;
pub mod resources;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

// Plugins - hosts usually only need the plugin and its event
pub use plugins::*;

pub use errors::{FlightError, FlightResult};

pub use pathfinding::{Cell, FlightGrid, FlightPath};

pub use resources::FlightSettings;

pub use terrain::{PassabilityRule, TerrainMap};
