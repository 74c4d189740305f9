//! # Generation Module
//!
//! Procedural level layout generation.
//!
//! Two independent strategies carve a [`Grid`] in place:
//!
//! - [`TrailDungeonGenerator`] carves winding trails, joins every pair of trail
//!   endpoints so the network is one connected component, then overlays rooms
//! - [`RoomsAndCorridorsGenerator`] places rooms and chains each one to its
//!   predecessor with an L-shaped tunnel
//!
//! [`LevelGenerator`] selects between them from a [`LevelGeneratorConfig`].

pub mod dungeon;
pub mod trail_carver;
pub mod trail_dungeon;

pub use dungeon::*;
pub use trail_carver::*;
pub use trail_dungeon::*;

use crate::world::{Grid, Position, Walkability};
use crate::{config, DelveError, DelveResult, RandomSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`TrailDungeonGenerator`].
///
/// Missing fields fall back to [`TrailDungeonConfig::default`] when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailDungeonConfig {
    /// Number of independent trails to carve
    pub num_trails: u32,
    /// Distance from the map edge that trails and their endpoints try to keep
    pub edge_margin: i32,
    /// Shortest straight trail segment
    pub min_segment_length: i32,
    /// Longest straight trail segment
    pub max_segment_length: i32,
    /// Chance (0.0 to 1.0) that a segment stops when it first runs into existing floor
    pub intersect_chance: f32,
    /// Minimum number of rooms to attempt
    pub min_rooms: u32,
    /// Maximum number of rooms to attempt
    pub max_rooms: u32,
    /// Minimum room size
    pub min_room_size: i32,
    /// Maximum room size
    pub max_room_size: i32,
}

impl TrailDungeonConfig {
    /// Gets the default configuration for a map of the given size.
    ///
    /// Both dimensions are ignored: the edge margin and room sizes are the same for
    /// every map. On maps narrower than twice the edge margin this leaves
    /// little or no room for placement, and rooms silently fail to appear.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::TrailDungeonConfig;
    ///
    /// let small = TrailDungeonConfig::default_for(20, 20);
    /// let large = TrailDungeonConfig::default_for(200, 200);
    /// assert_eq!(small, large);
    /// assert_eq!(small.edge_margin, 15);
    /// ```
    pub fn default_for(_width: u32, _height: u32) -> Self {
        Self {
            num_trails: 3,
            edge_margin: 15,
            min_segment_length: 3,
            max_segment_length: 8,
            intersect_chance: 0.5,
            min_rooms: 4,
            max_rooms: 8,
            min_room_size: 4,
            max_room_size: 10,
        }
    }

    /// Gets the per-trail settings handed to [`TrailCarver`].
    pub fn trail_config(&self) -> TrailConfig {
        TrailConfig {
            edge_margin: self.edge_margin,
            min_length: self.min_segment_length,
            max_length: self.max_segment_length,
            intersect_chance: self.intersect_chance,
        }
    }

    /// Rejects values that cannot drive generation.
    pub fn validate(&self) -> DelveResult<()> {
        if self.num_trails == 0 {
            return Err(DelveError::InvalidConfig(
                "num_trails must be at least 1".to_string(),
            ));
        }
        if self.edge_margin < 0 {
            return Err(DelveError::InvalidConfig(format!(
                "edge_margin must not be negative, got {}",
                self.edge_margin
            )));
        }
        self.trail_config().validate()?;
        if self.min_rooms > self.max_rooms {
            return Err(DelveError::InvalidConfig(format!(
                "min_rooms {} exceeds max_rooms {}",
                self.min_rooms, self.max_rooms
            )));
        }
        validate_room_sizes(self.min_room_size, self.max_room_size)
    }
}

impl Default for TrailDungeonConfig {
    fn default() -> Self {
        Self::default_for(config::DEFAULT_DUNGEON_WIDTH, config::DEFAULT_DUNGEON_HEIGHT)
    }
}

/// Configuration for [`RoomsAndCorridorsGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsAndCorridorsConfig {
    /// Number of placement attempts, and so the most rooms a level can have
    pub max_rooms: u32,
    /// Minimum room size
    pub min_room_size: i32,
    /// Maximum room size
    pub max_room_size: i32,
}

impl RoomsAndCorridorsConfig {
    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing() -> Self {
        Self {
            max_rooms: 8,
            min_room_size: 3,
            max_room_size: 6,
        }
    }

    /// Rejects values that cannot drive generation.
    pub fn validate(&self) -> DelveResult<()> {
        validate_room_sizes(self.min_room_size, self.max_room_size)
    }
}

impl Default for RoomsAndCorridorsConfig {
    fn default() -> Self {
        Self {
            max_rooms: 30,
            min_room_size: 6,
            max_room_size: 10,
        }
    }
}

fn validate_room_sizes(min_room_size: i32, max_room_size: i32) -> DelveResult<()> {
    if min_room_size < 2 {
        return Err(DelveError::InvalidConfig(format!(
            "min_room_size must be at least 2, got {}",
            min_room_size
        )));
    }
    if min_room_size > max_room_size {
        return Err(DelveError::InvalidConfig(format!(
            "min_room_size {} exceeds max_room_size {}",
            min_room_size, max_room_size
        )));
    }
    Ok(())
}

/// Selects a generation strategy and its settings.
///
/// Serialized with a `style` tag:
///
/// ```
/// use delve::LevelGeneratorConfig;
///
/// let config = LevelGeneratorConfig::from_json_str(
///     r#"{ "style": "rooms_and_corridors", "max_rooms": 12 }"#,
/// ).unwrap();
/// match config {
///     LevelGeneratorConfig::RoomsAndCorridors(rooms) => assert_eq!(rooms.max_rooms, 12),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum LevelGeneratorConfig {
    /// Winding trails with full endpoint connectivity and a room overlay
    Trails(TrailDungeonConfig),
    /// Rooms chained by L-shaped tunnels
    RoomsAndCorridors(RoomsAndCorridorsConfig),
}

impl LevelGeneratorConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> DelveResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects values that cannot drive generation.
    pub fn validate(&self) -> DelveResult<()> {
        match self {
            LevelGeneratorConfig::Trails(config) => config.validate(),
            LevelGeneratorConfig::RoomsAndCorridors(config) => config.validate(),
        }
    }
}

impl Default for LevelGeneratorConfig {
    fn default() -> Self {
        LevelGeneratorConfig::Trails(TrailDungeonConfig::default())
    }
}

/// An axis-aligned rectangular room.
///
/// `origin` is the top-left corner and `end` the bottom-right one; both lie on the
/// room's wall border. Only the strict interior is carved to floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Top-left corner of the room
    pub origin: Position,
    /// Bottom-right corner of the room, `origin + (width, height)`
    pub end: Position,
}

impl Room {
    /// Creates a room from its top-left corner and size.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let room = Room::new(Position::new(5, 5), 10, 8);
    /// assert_eq!(room.end, Position::new(15, 13));
    /// assert_eq!(room.inner().len(), 9 * 7);
    /// ```
    pub fn new(origin: Position, width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "room size must be positive, got {}x{}",
            width,
            height
        );
        Self {
            origin,
            end: Position::new(origin.x + width, origin.y + height),
        }
    }

    pub fn width(&self) -> i32 {
        self.end.x - self.origin.x
    }

    pub fn height(&self) -> i32 {
        self.end.y - self.origin.y
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            (self.origin.x + self.end.x) / 2,
            (self.origin.y + self.end.y) / 2,
        )
    }

    /// Gets the strict interior, leaving a 1-tile wall border.
    pub fn inner(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.origin.y + 1)..self.end.y {
            for x in (self.origin.x + 1)..self.end.x {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Gets the border positions that touch the interior (the border minus its corners).
    pub fn border_without_corners(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for x in (self.origin.x + 1)..self.end.x {
            positions.push(Position::new(x, self.origin.y));
            positions.push(Position::new(x, self.end.y));
        }
        for y in (self.origin.y + 1)..self.end.y {
            positions.push(Position::new(self.origin.x, y));
            positions.push(Position::new(self.end.x, y));
        }

        positions
    }

    /// Checks if this room overlaps another, border included.
    ///
    /// Rooms that merely share a border row or column count as intersecting.
    pub fn intersects(&self, other: &Room) -> bool {
        self.origin.x <= other.end.x
            && self.end.x >= other.origin.x
            && self.origin.y <= other.end.y
            && self.end.y >= other.origin.y
    }
}

/// One winding corridor carved between two points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    /// Where carving began
    pub start: Position,
    /// Where carving was aimed and finished
    pub end: Position,
    /// Every carved position in order, from `start` to `end`
    pub path: Vec<Position>,
}

/// An L-shaped tunnel between two room centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// Center of the earlier room
    pub from: Position,
    /// Where the horizontal and vertical legs meet
    pub corner: Position,
    /// Center of the later room
    pub to: Position,
}

impl Corridor {
    /// Gets every position on both legs, from `from` through `corner` to `to`.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = straight_line(self.from, self.corner);
        positions.extend(straight_line(self.corner, self.to).into_iter().skip(1));
        positions
    }
}

/// Positions from `a` to `b` inclusive along one axis.
fn straight_line(a: Position, b: Position) -> Vec<Position> {
    debug_assert!(a.x == b.x || a.y == b.y);
    let steps = a.manhattan_distance(b) as i32;
    let dx = (b.x - a.x).signum();
    let dy = (b.y - a.y).signum();
    (0..=steps)
        .map(|i| Position::new(a.x + dx * i, a.y + dy * i))
        .collect()
}

/// Common interface for level generators.
///
/// A generator consumes a mutable grid and carves it fully. Metadata from the most
/// recent call is available afterwards; each call replaces it.
pub trait Generator {
    /// Carves a level into `grid`.
    fn generate<W: Walkability>(&mut self, grid: &mut Grid<W>);

    /// Checks the structural guarantees this generator makes about `grid`.
    fn validate<W: Walkability>(&self, grid: &Grid<W>) -> DelveResult<()>;

    /// Rooms placed by the most recent generation.
    fn rooms(&self) -> &[Room];

    /// A floor position suitable for placing the player, if any.
    fn spawn_point(&self) -> Option<Position>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Tagged choice between the two generation strategies.
#[derive(Debug, Clone)]
pub enum LevelGenerator<R: RandomSource> {
    Trails(TrailDungeonGenerator<R>),
    RoomsAndCorridors(RoomsAndCorridorsGenerator<R>),
}

impl<R: RandomSource> LevelGenerator<R> {
    /// Builds the generator a configuration asks for, drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::InvalidConfig`] if the configuration fails validation.
    pub fn from_config(config: LevelGeneratorConfig, rng: R) -> DelveResult<Self> {
        config.validate()?;
        Ok(match config {
            LevelGeneratorConfig::Trails(config) => {
                LevelGenerator::Trails(TrailDungeonGenerator::new(config, rng))
            }
            LevelGeneratorConfig::RoomsAndCorridors(config) => {
                LevelGenerator::RoomsAndCorridors(RoomsAndCorridorsGenerator::new(config, rng))
            }
        })
    }

    /// Trails carved by the most recent generation; empty for the rooms pipeline.
    pub fn trails(&self) -> &[Trail] {
        match self {
            LevelGenerator::Trails(generator) => generator.trails(),
            LevelGenerator::RoomsAndCorridors(_) => &[],
        }
    }
}

impl<R: RandomSource> Generator for LevelGenerator<R> {
    fn generate<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        match self {
            LevelGenerator::Trails(generator) => generator.generate(grid),
            LevelGenerator::RoomsAndCorridors(generator) => generator.generate(grid),
        }
    }

    fn validate<W: Walkability>(&self, grid: &Grid<W>) -> DelveResult<()> {
        match self {
            LevelGenerator::Trails(generator) => generator.validate(grid),
            LevelGenerator::RoomsAndCorridors(generator) => generator.validate(grid),
        }
    }

    fn rooms(&self) -> &[Room] {
        match self {
            LevelGenerator::Trails(generator) => generator.rooms(),
            LevelGenerator::RoomsAndCorridors(generator) => generator.rooms(),
        }
    }

    fn spawn_point(&self) -> Option<Position> {
        match self {
            LevelGenerator::Trails(generator) => generator.spawn_point(),
            LevelGenerator::RoomsAndCorridors(generator) => generator.spawn_point(),
        }
    }

    fn generator_type(&self) -> &'static str {
        match self {
            LevelGenerator::Trails(generator) => generator.generator_type(),
            LevelGenerator::RoomsAndCorridors(generator) => generator.generator_type(),
        }
    }
}

/// Shared carving and validation helpers for generation algorithms.
pub mod utils {
    use super::*;
    use ::pathfinding::prelude::bfs_reach;
    use std::collections::HashSet;

    /// Carves a room's interior to floor.
    pub fn carve_room<W: Walkability>(grid: &mut Grid<W>, room: &Room) {
        for pos in room.inner() {
            grid.carve(pos);
        }
    }

    /// Carves every position of a route to floor. Returns how many tiles changed.
    pub fn carve_route<W: Walkability>(grid: &mut Grid<W>, route: &[Position]) -> usize {
        route.iter().filter(|&&pos| grid.carve(pos)).count()
    }

    /// Draws a random room that keeps the outermost ring of the grid solid.
    ///
    /// Returns `None` when a room of the drawn size cannot fit, which callers count
    /// as a failed placement attempt.
    pub fn random_room<W: Walkability, R: RandomSource + ?Sized>(
        grid: &Grid<W>,
        min_size: i32,
        max_size: i32,
        rng: &mut R,
    ) -> Option<Room> {
        let width = rng.next_int(min_size, max_size);
        let height = rng.next_int(min_size, max_size);

        let max_x = grid.width() as i32 - 2 - width;
        let max_y = grid.height() as i32 - 2 - height;
        if max_x < 1 || max_y < 1 {
            return None;
        }

        let x = rng.next_int(1, max_x);
        let y = rng.next_int(1, max_y);
        Some(Room::new(Position::new(x, y), width, height))
    }

    /// Collects every floor tile orthogonally reachable from `start`.
    pub fn reachable_floor<W: Walkability>(grid: &Grid<W>, start: Position) -> HashSet<Position> {
        if !grid.is_in_bounds(start) || !grid.is_floor(start) {
            return HashSet::new();
        }
        bfs_reach(start, |pos: &Position| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|&next| grid.is_in_bounds(next) && grid.is_floor(next))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Counts the floor tiles reachable from the first floor tile, and all floor tiles.
    pub fn floor_connectivity<W: Walkability>(grid: &Grid<W>) -> (usize, usize) {
        let floor = grid.floor_positions();
        match floor.first() {
            Some(&first) => (reachable_floor(grid, first).len(), floor.len()),
            None => (0, 0),
        }
    }

    /// Validates that a level has at least one floor tile.
    pub fn validate_level<W: Walkability>(grid: &Grid<W>) -> DelveResult<()> {
        if grid.count(crate::TileType::Floor) == 0 {
            return Err(DelveError::GenerationFailed(
                "Level has no floor tiles".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates that every floor tile belongs to one connected component.
    pub fn validate_connected<W: Walkability>(grid: &Grid<W>) -> DelveResult<()> {
        let (reachable, total) = floor_connectivity(grid);
        if reachable != total {
            return Err(DelveError::GenerationFailed(format!(
                "only {} of {} floor tiles are connected",
                reachable, total
            )));
        }
        Ok(())
    }

    /// Validates that no two rooms intersect.
    pub fn validate_no_overlap(rooms: &[Room]) -> DelveResult<()> {
        for (i, first) in rooms.iter().enumerate() {
            for (j, second) in rooms.iter().enumerate().skip(i + 1) {
                if first.intersects(second) {
                    return Err(DelveError::GenerationFailed(format!(
                        "rooms {} and {} overlap",
                        i, j
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validates that every room center is reachable from the first room's center.
    pub fn validate_chain<W: Walkability>(grid: &Grid<W>, rooms: &[Room]) -> DelveResult<()> {
        let Some(first) = rooms.first() else {
            return Ok(());
        };
        let reachable = reachable_floor(grid, first.center());
        for (i, room) in rooms.iter().enumerate() {
            if !reachable.contains(&room.center()) {
                return Err(DelveError::GenerationFailed(format!(
                    "room {} is not connected to room 0",
                    i
                )));
            }
        }
        Ok(())
    }
}
