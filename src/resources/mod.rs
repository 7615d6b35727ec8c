use crate::config::range_types::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning constants for path queries.
#[derive(Resource, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FlightSettings {
    /// Below this distance a clear straight line is returned without running A*
    pub fast_path_distance: FastPathDistance,
    /// Maximum ring radius when relocating a blocked start cell
    pub nearest_search_radius: SearchRadius,
    /// Sample budget for `random_flyable_cell_near`
    pub random_attempts: AttemptBudget,
    /// A* expansion cap (0 = width * height)
    pub max_expansions: ExpansionLimit,
}
