use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::{Parser, Subcommand};
use flight_grid::config::load_config;
use flight_grid::pathfinding::line_cells;
use flight_grid::terrain_generation::get_terrain_preset;
use flight_grid::{
    Cell, FlightError, FlightGrid, FlightGridPlugin, FlightPath, FlightResult, TerrainMap,
};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::path::{Path, PathBuf};

mod flightplan {
    pub mod cli_utils;
}

use flightplan::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "flightplan")]
#[command(about = "Plan flying routes over roofed terrain maps")]
struct Args {
    /// Log grid construction and search details
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Find a flight path between two cells
    Path {
        #[command(flatten)]
        map: MapArgs,

        /// Start cell (format: X,Z)
        #[arg(long)]
        from: String,

        /// Destination cell (format: X,Z)
        #[arg(long)]
        to: String,

        /// Print the unsimplified grid-step path
        #[arg(long)]
        raw: bool,
    },

    /// Generate a mountain terrain map under maps/
    Generate {
        /// Terrain size in grid cells (format: WIDTHxHEIGHT)
        #[arg(long, default_value = "64x64")]
        size: String,

        /// Terrain preset (open, hills, mountains)
        #[arg(long, default_value = "mountains")]
        preset: String,

        /// Random seed for reproducible generation
        #[arg(long)]
        seed: Option<u32>,

        /// Output file path relative to the maps/ directory
        #[arg(long)]
        output: Option<String>,

        /// Also print the generated map
        #[arg(long)]
        print: bool,
    },

    /// Find the nearest flyable cell to a point
    Nearest {
        #[command(flatten)]
        map: MapArgs,

        /// Query cell (format: X,Z)
        #[arg(long)]
        at: String,
    },

    /// Sample random flyable cells around a center
    Scatter {
        /// Map file; an open map of --size is used when omitted
        #[arg(long)]
        map: Option<PathBuf>,

        /// Treat the map file as ASCII art instead of bincode
        #[arg(long)]
        ascii: bool,

        /// Open map size when no map is given (format: WIDTHxHEIGHT)
        #[arg(long, default_value = "32x32")]
        size: String,

        /// Center cell (format: X,Z)
        #[arg(long)]
        center: String,

        /// Sampling radius in cells
        #[arg(long, default_value = "6.0")]
        radius: f32,

        /// Number of samples to draw
        #[arg(long, default_value = "5")]
        count: usize,

        /// Random seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args, Clone)]
struct MapArgs {
    /// Map file (bincode, or ASCII art with --ascii)
    #[arg(long)]
    map: PathBuf,

    /// Treat the map file as ASCII art instead of bincode
    #[arg(long)]
    ascii: bool,
}

fn load_terrain(path: &Path, ascii: bool) -> FlightResult<TerrainMap> {
    if !ascii {
        return TerrainMap::load_from_path(path);
    }
    if !path.exists() {
        return Err(FlightError::MapFileNotFound {
            path: path.to_path_buf(),
        });
    }
    TerrainMap::from_ascii(&std::fs::read_to_string(path)?)
}

/// Headless app running the flight grid plugin over `terrain`
fn build_app(terrain: TerrainMap, verbose: bool) -> App {
    let mut app = App::new();
    app.add_plugins((
        LogPlugin {
            level: if verbose { Level::DEBUG } else { Level::INFO },
            ..default()
        },
        FlightGridPlugin,
    ));
    app.insert_resource(load_config()).insert_resource(terrain);
    app.update();
    app
}

fn flight_grid(app: &App) -> FlightResult<&FlightGrid> {
    app.world()
        .get_resource::<FlightGrid>()
        .ok_or_else(|| FlightError::InvalidMapData {
            reason: "Flight grid was not built from the terrain map".to_string(),
        })
}

/// Every cell the route passes over, for rendering
fn route_cells(path: &FlightPath) -> Vec<Cell> {
    let mut cells = Vec::new();
    for pair in path.cells().windows(2) {
        cells.extend(line_cells(pair[0], pair[1]));
    }
    if let Some(last) = path.last() {
        cells.push(last);
    }
    cells
}

fn run_path(map: &MapArgs, from: &str, to: &str, raw: bool, verbose: bool) -> FlightResult<()> {
    let (start, destination) = (parse_cell(from)?, parse_cell(to)?);
    let app = build_app(load_terrain(&map.map, map.ascii)?, verbose);
    let grid = flight_grid(&app)?;

    let path = if raw {
        grid.find_raw_path(start, destination)
    } else {
        grid.find_path(start, destination)
    };

    let Some(path) = path else {
        println!("No flight path from {start} to {destination}");
        return Ok(());
    };

    println!(
        "Flight path from {start} to {destination}: {} waypoints, cost {:.3}",
        path.len(),
        path.step_cost()
    );
    for (i, cell) in path.iter().enumerate() {
        println!("  {i}: {cell}");
    }
    println!("\n{}", grid.render(&route_cells(&path)));
    Ok(())
}

fn run_generate(
    size: &str,
    preset: &str,
    seed: Option<u32>,
    output: Option<String>,
    print: bool,
) -> FlightResult<()> {
    let (width, height) = parse_size(size)?;
    let output_filename = output.unwrap_or_else(|| format!("{preset}.bin"));
    validate_output_path(&output_filename)?;

    let generator =
        get_terrain_preset(preset, seed).ok_or_else(|| FlightError::InvalidArgument {
            reason: format!("Unknown terrain preset '{preset}'. Use open, hills or mountains"),
        })?;
    let terrain = generator.generate(width, height)?;
    let full_path = terrain.save_to_file(&output_filename)?;
    let grid = FlightGrid::from_terrain_map(&terrain);

    println!("Map saved successfully to: {}", full_path.display());
    println!("\nMap summary:");
    println!("  Preset: {preset} (seed {})", generator.seed);
    println!("  Terrain: {width}x{height}");
    println!(
        "  Blocked for flight: {} of {} cells",
        grid.blocked_count(),
        grid.cell_count()
    );
    if print {
        println!("\n{}", terrain.to_ascii());
    }
    Ok(())
}

fn run_nearest(map: &MapArgs, at: &str, verbose: bool) -> FlightResult<()> {
    let at = parse_cell(at)?;
    let app = build_app(load_terrain(&map.map, map.ascii)?, verbose);
    let grid = flight_grid(&app)?;

    match grid.find_nearest_flyable_cell(at) {
        Some(cell) => println!("Nearest flyable cell to {at}: {cell}"),
        None => println!(
            "No flyable cell within {} cells of {at}",
            grid.settings().nearest_search_radius
        ),
    }
    Ok(())
}

struct ScatterArgs {
    map: Option<PathBuf>,
    ascii: bool,
    size: String,
    center: String,
    radius: f32,
    count: usize,
    seed: Option<u64>,
}

fn run_scatter(args: ScatterArgs, verbose: bool) -> FlightResult<()> {
    let center = parse_cell(&args.center)?;
    let terrain = match &args.map {
        Some(path) => load_terrain(path, args.ascii)?,
        None => {
            let (width, height) = parse_size(&args.size)?;
            TerrainMap::open(width, height)?
        }
    };
    let app = build_app(terrain, verbose);
    let grid = flight_grid(&app)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg64::seed_from_u64(seed);
    let samples: Vec<Cell> = (0..args.count)
        .map(|_| grid.random_flyable_cell_near(center, args.radius, &mut rng))
        .collect();

    println!("Samples around {center} (radius {}, seed {seed}):", args.radius);
    for cell in &samples {
        println!("  {cell}");
    }
    println!("\n{}", grid.render(&samples));
    Ok(())
}

fn main() -> FlightResult<()> {
    let args = Args::parse();

    match args.command {
        Command::Path { map, from, to, raw } => run_path(&map, &from, &to, raw, args.verbose),
        Command::Generate {
            size,
            preset,
            seed,
            output,
            print,
        } => run_generate(&size, &preset, seed, output, print),
        Command::Nearest { map, at } => run_nearest(&map, &at, args.verbose),
        Command::Scatter {
            map,
            ascii,
            size,
            center,
            radius,
            count,
            seed,
        } => run_scatter(
            ScatterArgs {
                map,
                ascii,
                size,
                center,
                radius,
                count,
                seed,
            },
            args.verbose,
        ),
    }
}
