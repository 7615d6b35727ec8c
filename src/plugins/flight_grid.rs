use crate::components::{FlightPlan, GridPosition};
use crate::pathfinding::{Cell, FlightGrid};
use crate::resources::FlightSettings;
use crate::terrain::TerrainMap;
use bevy::prelude::*;

/// Terrain edits reported by the map's owner
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainChanged {
    /// Large-scale change (map load, roof collapse); rebuild everything
    Broad,
    /// One cell changed (building placed or removed)
    Cell(Cell),
}

pub struct FlightGridPlugin;

impl Plugin for FlightGridPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TerrainChanged>()
            .init_resource::<FlightSettings>()
            .add_systems(
                Update,
                (
                    build_flight_grid.run_if(flight_grid_out_of_date),
                    apply_terrain_changes,
                    plan_flights,
                    advance_flights,
                )
                    .chain(),
            );
    }
}

/// True when a terrain map exists and the grid is missing, was built for a different
/// map size, or the map resource was newly added.
///
/// Replacing a map with one of the same size is only picked up through `TerrainChanged::Broad`.
pub fn flight_grid_out_of_date(
    terrain: Option<Res<TerrainMap>>,
    grid: Option<Res<FlightGrid>>,
) -> bool {
    let Some(terrain) = terrain else {
        return false;
    };
    match grid {
        None => true,
        Some(grid) => {
            terrain.is_added()
                || grid.width() != terrain.width()
                || grid.height() != terrain.height()
        }
    }
}

/// (Re)create the grid from the current terrain map, e.g. on session load
pub fn build_flight_grid(
    mut commands: Commands,
    terrain: Res<TerrainMap>,
    settings: Res<FlightSettings>,
    mut plans: Query<&mut FlightPlan>,
) {
    let grid = FlightGrid::from_terrain_map(&terrain).with_settings(*settings);
    info!(
        "Created flight grid ({width}x{height})",
        width = grid.width(),
        height = grid.height()
    );
    commands.insert_resource(grid);

    for mut plan in &mut plans {
        plan.invalidate();
    }
}

/// Replace the grid from the current terrain map, e.g. when a session is restarted.
///
/// Returns false (and leaves any existing grid alone) when no terrain map is loaded.
pub fn reset_flight_grid(world: &mut World) -> bool {
    let settings = world
        .get_resource::<FlightSettings>()
        .copied()
        .unwrap_or_default();
    let Some(terrain) = world.get_resource::<TerrainMap>() else {
        warn!("Cannot reset flight grid: no terrain map loaded");
        return false;
    };
    let grid = FlightGrid::from_terrain_map(terrain).with_settings(settings);
    world.insert_resource(grid);

    let mut plans = world.query::<&mut FlightPlan>();
    for mut plan in plans.iter_mut(world) {
        plan.invalidate();
    }
    true
}

/// Apply this frame's terrain events; a `Broad` event collapses the batch into one rebuild
pub fn apply_terrain_changes(
    mut events: EventReader<TerrainChanged>,
    terrain: Option<Res<TerrainMap>>,
    grid: Option<ResMut<FlightGrid>>,
    mut plans: Query<&mut FlightPlan>,
) {
    let changes: Vec<TerrainChanged> = events.read().copied().collect();
    if changes.is_empty() {
        return;
    }

    let (Some(terrain), Some(mut grid)) = (terrain, grid) else {
        warn!(
            "Dropping {} terrain change(s): no terrain map or flight grid loaded",
            changes.len()
        );
        return;
    };

    let changed = if changes.contains(&TerrainChanged::Broad) {
        grid.rebuild(&*terrain);
        true
    } else {
        let mut any = false;
        for change in &changes {
            if let TerrainChanged::Cell(cell) = change {
                any |= grid.update_cell(&*terrain, *cell);
            }
        }
        any
    };

    // Computed routes never outlive a terrain change
    if changed {
        for mut plan in &mut plans {
            plan.invalidate();
        }
    }
}

/// Query routes for agents that have a destination but no waypoints
pub fn plan_flights(
    grid: Option<Res<FlightGrid>>,
    mut agents: Query<(Entity, &GridPosition, &mut FlightPlan)>,
) {
    let Some(grid) = grid else {
        return;
    };

    for (entity, position, mut plan) in &mut agents {
        if !plan.needs_plan() {
            continue;
        }
        let Some(destination) = plan.destination else {
            continue;
        };

        match grid.find_path(**position, destination) {
            Some(path) => {
                debug!(
                    "Planned flight for {entity:?} with {} waypoints from {} to {destination}",
                    path.len(),
                    **position
                );
                plan.set_path(path);
            }
            None => {
                warn!(
                    "Failed to find flight path for {entity:?} from {} to {destination}",
                    **position
                );
                plan.unreachable = true;
            }
        }
    }
}

/// Step past every waypoint the agent is standing on
pub fn advance_flights(mut agents: Query<(&GridPosition, &mut FlightPlan)>) {
    for (position, mut plan) in &mut agents {
        while plan.current_waypoint() == Some(**position) {
            plan.advance_waypoint();
            if !plan.has_path() {
                debug!("Flight to {:?} completed", plan.destination);
            }
        }
    }
}
