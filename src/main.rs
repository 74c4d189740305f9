//! # Delve Command Line Tool
//!
//! Generates a single level and prints it as ASCII art or as a JSON report.

use clap::{Parser, ValueEnum};
use delve::{
    config, create_rng, DelveResult, Generator, Grid, LevelGenerator, LevelGeneratorConfig,
    Position, Room, RoomsAndCorridorsConfig, Trail, TrailDungeonConfig,
};
use serde::Serialize;
use std::path::PathBuf;

#[cfg(not(feature = "dev-tools"))]
use log::info;
#[cfg(feature = "dev-tools")]
use tracing::{info, Level};

/// Built-in generation styles selectable without a config file.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    /// Winding trails joined into one network, with rooms overlaid
    Trails,
    /// Rooms chained by L-shaped tunnels
    Rooms,
}

/// Command line arguments for the Delve level generator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Procedural dungeon level generator")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level width in tiles
    #[arg(
        long,
        default_value_t = config::DEFAULT_DUNGEON_WIDTH,
        value_parser = clap::value_parser!(u32).range(3..)
    )]
    width: u32,

    /// Level height in tiles
    #[arg(
        long,
        default_value_t = config::DEFAULT_DUNGEON_HEIGHT,
        value_parser = clap::value_parser!(u32).range(3..)
    )]
    height: u32,

    /// Generation style, ignored when --config is given
    #[arg(long, value_enum, default_value_t = Style::Trails)]
    style: Style,

    /// JSON file with generator settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the ASCII map
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Machine-readable summary of one generated level.
#[derive(Serialize)]
struct LevelReport<'a> {
    generator: &'static str,
    seed: u64,
    width: u32,
    height: u32,
    spawn: Option<Position>,
    rooms: &'a [Room],
    trails: &'a [Trail],
    map: Vec<String>,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Delve v{}", delve::VERSION);

    let generator_config = match &args.config {
        Some(path) => {
            info!("Loading generator settings from {}", path.display());
            LevelGeneratorConfig::load(path)?
        }
        None => match args.style {
            Style::Trails => LevelGeneratorConfig::Trails(TrailDungeonConfig::default_for(
                args.width,
                args.height,
            )),
            Style::Rooms => {
                LevelGeneratorConfig::RoomsAndCorridors(RoomsAndCorridorsConfig::default())
            }
        },
    };

    let seed = args.seed.unwrap_or(config::DEFAULT_SEED);
    info!("Generating {}x{} level with seed: {}", args.width, args.height, seed);

    let mut grid = Grid::new(args.width, args.height);
    let mut generator = LevelGenerator::from_config(generator_config, create_rng(seed))?;
    generator.generate(&mut grid);
    generator.validate(&grid)?;

    info!(
        "{} placed {} rooms",
        generator.generator_type(),
        generator.rooms().len()
    );

    if args.json {
        let report = LevelReport {
            generator: generator.generator_type(),
            seed,
            width: grid.width(),
            height: grid.height(),
            spawn: generator.spawn_point(),
            rooms: generator.rooms(),
            trails: generator.trails(),
            map: grid.to_string().lines().map(str::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", grid);
    }

    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> DelveResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .target(env_logger::Target::Stderr)
            .init();
    }

    Ok(())
}
