use crate::pathfinding::{Cell, FlightPath};
use bevy::prelude::*;

/// The cell an agent currently occupies
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref, DerefMut)]
pub struct GridPosition(pub Cell);

/// Flight route an agent is following
#[derive(Component, Debug, Clone, Default)]
pub struct FlightPlan {
    pub destination: Option<Cell>,
    waypoints: Vec<Cell>,
    current_index: usize,
    /// Set when the last query for `destination` found no route
    pub unreachable: bool,
}

impl FlightPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toward(destination: Cell) -> Self {
        Self {
            destination: Some(destination),
            ..Self::default()
        }
    }

    /// Retarget; the old route is dropped and replanned on the next update
    pub fn set_destination(&mut self, destination: Cell) {
        self.destination = Some(destination);
        self.invalidate();
    }

    pub fn set_path(&mut self, path: FlightPath) {
        self.waypoints = path.into_cells();
        self.current_index = 0;
        self.unreachable = false;
    }

    /// Forget the current route so it is planned again
    pub fn invalidate(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
        self.unreachable = false;
    }

    pub fn has_path(&self) -> bool {
        self.current_index < self.waypoints.len()
    }

    pub fn needs_plan(&self) -> bool {
        self.destination.is_some() && self.waypoints.is_empty() && !self.unreachable
    }

    pub fn current_waypoint(&self) -> Option<Cell> {
        self.waypoints.get(self.current_index).copied()
    }

    pub fn advance_waypoint(&mut self) {
        if self.current_index < self.waypoints.len() {
            self.current_index += 1;
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn waypoints(&self) -> &[Cell] {
        &self.waypoints
    }

    pub fn final_destination(&self) -> Option<Cell> {
        self.waypoints.last().copied()
    }
}
