pub mod flight_grid;

pub use flight_grid::*;
