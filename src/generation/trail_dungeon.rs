//! # Trail Dungeon Generation
//!
//! Organic levels built from winding trails.
//!
//! Generation runs in three phases:
//! 1. Carve `num_trails` independent trails between random endpoints
//! 2. Join every pair of trail endpoints with a carved best-first route, making the
//!    whole trail network one connected component
//! 3. Overlay non-overlapping rooms, linking any room that does not already touch the
//!    network
//!
//! The connecting phase runs one search per endpoint pair, which is quadratic in the
//! trail count and only meant for a handful of trails.

use super::utils;
use crate::utils::pathfinding::PathFinder;
use crate::world::{Grid, Position, Walkability};
use crate::{DelveResult, Generator, RandomSource, Room, Trail, TrailCarver, TrailDungeonConfig};

/// Placement attempts allowed per requested room.
pub const ROOM_ATTEMPTS_PER_ROOM: u32 = 10;

/// Generator for trail-based levels.
///
/// The grid passed to [`Generator::generate`] should be freshly constructed or
/// [cleared](Grid::clear); the connectivity guarantee only covers floor this
/// generator carved itself.
///
/// # Examples
///
/// ```
/// use delve::{create_rng, Generator, Grid, TrailDungeonConfig, TrailDungeonGenerator};
///
/// let mut grid = Grid::new(80, 45);
/// let mut generator = TrailDungeonGenerator::new(TrailDungeonConfig::default(), create_rng(9));
/// generator.generate(&mut grid);
///
/// assert_eq!(generator.trails().len(), 3);
/// assert!(generator.validate(&grid).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TrailDungeonGenerator<R: RandomSource> {
    /// Tuning parameters
    pub config: TrailDungeonConfig,
    rng: R,
    trails: Vec<Trail>,
    rooms: Vec<Room>,
}

impl<R: RandomSource> TrailDungeonGenerator<R> {
    /// Creates a generator that draws all randomness from `rng`.
    pub fn new(config: TrailDungeonConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            trails: Vec::new(),
            rooms: Vec::new(),
        }
    }

    /// Trails carved by the most recent generation.
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Every trail start and end, in trail order.
    pub fn trail_endpoints(&self) -> Vec<Position> {
        self.trails.iter().flat_map(|t| [t.start, t.end]).collect()
    }

    /// Carves `num_trails` independent trails between random endpoints.
    fn generate_trails<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        self.trails.clear();

        let margin = self.config.edge_margin;
        if 2 * margin >= grid.width() as i32 || 2 * margin >= grid.height() as i32 {
            log::warn!(
                "edge margin {} does not fit a {}x{} grid; endpoints will crowd the center",
                margin,
                grid.width(),
                grid.height()
            );
        }

        let carver = TrailCarver::new(self.config.trail_config());
        for _ in 0..self.config.num_trails {
            let start = self.random_endpoint(grid);
            let end = self.random_endpoint(grid);
            let path = carver.generate_trail(grid, start, end, &mut self.rng);
            log::trace!("carved trail {} -> {} ({} tiles)", start, end, path.len());
            self.trails.push(Trail { start, end, path });
        }
    }

    /// Picks a trail endpoint inside the edge margin.
    ///
    /// When the margin leaves no usable band on an axis, it shrinks to the largest
    /// margin that still leaves one.
    fn random_endpoint<W: Walkability>(&mut self, grid: &Grid<W>) -> Position {
        let x = self.random_coordinate(grid.width() as i32);
        let y = self.random_coordinate(grid.height() as i32);
        Position::new(x, y)
    }

    fn random_coordinate(&mut self, extent: i32) -> i32 {
        let margin = self.config.edge_margin.min((extent - 1) / 2).max(0);
        self.rng.next_int(margin, extent - 1 - margin)
    }

    /// Joins every unordered pair of trail endpoints with a carved route.
    fn connect_trails<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        let endpoints = self.trail_endpoints();
        let finder = PathFinder::carving();
        let mut searches = 0usize;
        let mut carved = 0usize;

        for (i, &from) in endpoints.iter().enumerate() {
            for &to in &endpoints[i + 1..] {
                let route = finder.find_path(grid, from, to, &mut self.rng);
                carved += utils::carve_route(grid, &route);
                searches += 1;
            }
        }

        log::debug!(
            "connected {} trail endpoints with {} searches, carving {} tiles",
            endpoints.len(),
            searches,
            carved
        );
    }

    /// Places up to a random number of non-overlapping rooms.
    ///
    /// Falling short of the target after all attempts is a normal outcome.
    fn place_rooms<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        self.rooms.clear();

        let target = self.room_target();
        let max_attempts = target.saturating_mul(ROOM_ATTEMPTS_PER_ROOM);
        let mut anchors = self.trail_endpoints();
        let mut attempts = 0;

        while attempts < max_attempts && (self.rooms.len() as u32) < target {
            attempts += 1;

            let Some(room) = utils::random_room(
                grid,
                self.config.min_room_size,
                self.config.max_room_size,
                &mut self.rng,
            ) else {
                continue;
            };

            if self.rooms.iter().any(|existing| existing.intersects(&room)) {
                continue;
            }

            let joins_network = Self::touches_floor(grid, &room);
            utils::carve_room(grid, &room);
            if !joins_network {
                self.link_room(grid, &room, &anchors);
            }

            log::trace!("placed room {} at {}", self.rooms.len(), room.origin);
            // A room without interior leaves its center as wall, which nothing can link to.
            if grid.is_floor(room.center()) {
                anchors.push(room.center());
            }
            self.rooms.push(room);
        }

        log::debug!(
            "placed {} of {} rooms in {} attempts",
            self.rooms.len(),
            target,
            attempts
        );
    }

    /// Draws how many rooms to aim for, within `min_rooms..=max_rooms`.
    fn room_target(&mut self) -> u32 {
        let min = self.config.min_rooms;
        let spread = self.config.max_rooms.saturating_sub(min).min(i32::MAX as u32);
        min.saturating_add(self.rng.next_int(0, spread as i32) as u32)
    }

    /// Whether carving `room` would open onto existing floor.
    fn touches_floor<W: Walkability>(grid: &Grid<W>, room: &Room) -> bool {
        room.inner()
            .into_iter()
            .chain(room.border_without_corners())
            .any(|pos| grid.is_floor(pos))
    }

    /// Carves a route from an isolated room to the nearest anchor.
    fn link_room<W: Walkability>(
        &mut self,
        grid: &mut Grid<W>,
        room: &Room,
        anchors: &[Position],
    ) {
        let center = room.center();
        if !grid.is_floor(center) {
            return;
        }
        let Some(&anchor) = anchors
            .iter()
            .filter(|&&anchor| grid.is_floor(anchor))
            .min_by_key(|anchor| anchor.manhattan_distance(center))
        else {
            return;
        };

        let route = PathFinder::carving().find_path(grid, center, anchor, &mut self.rng);
        if route.is_empty() {
            log::warn!("no route from room at {} to {}", center, anchor);
            return;
        }
        let carved = utils::carve_route(grid, &route);
        log::trace!("linked room at {} to {} ({} tiles)", center, anchor, carved);
    }
}

impl<R: RandomSource> Generator for TrailDungeonGenerator<R> {
    fn generate<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        log::debug!(
            "generating trail dungeon on {}x{} grid",
            grid.width(),
            grid.height()
        );

        self.generate_trails(grid);
        self.connect_trails(grid);
        self.place_rooms(grid);
    }

    fn validate<W: Walkability>(&self, grid: &Grid<W>) -> DelveResult<()> {
        utils::validate_level(grid)?;
        utils::validate_no_overlap(&self.rooms)?;
        utils::validate_connected(grid)
    }

    fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn spawn_point(&self) -> Option<Position> {
        self.trails.first().map(|trail| trail.start)
    }

    fn generator_type(&self) -> &'static str {
        "TrailDungeonGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::create_rng;
    use crate::TileType;

    type SeededGenerator = TrailDungeonGenerator<rand::rngs::StdRng>;

    fn generate_with(
        config: TrailDungeonConfig,
        seed: u64,
        width: u32,
        height: u32,
    ) -> (SeededGenerator, Grid) {
        let mut grid = Grid::new(width, height);
        let mut generator = TrailDungeonGenerator::new(config, create_rng(seed));
        generator.generate(&mut grid);
        (generator, grid)
    }

    fn generate(seed: u64, width: u32, height: u32) -> (SeededGenerator, Grid) {
        generate_with(TrailDungeonConfig::default(), seed, width, height)
    }

    #[test]
    fn test_generator_creation() {
        let generator = SeededGenerator::new(TrailDungeonConfig::default(), create_rng(1));
        assert!(generator.trails().is_empty());
        assert!(generator.rooms().is_empty());
        assert_eq!(generator.spawn_point(), None);
        assert_eq!(generator.generator_type(), "TrailDungeonGenerator");
    }

    #[test]
    fn test_generated_levels_are_connected() {
        for seed in 0..10 {
            let (generator, grid) = generate(seed, 80, 45);
            assert!(generator.validate(&grid).is_ok(), "seed {} failed validation", seed);
            assert_eq!(generator.trails().len(), 3);
            assert!(generator.rooms().len() <= generator.config.max_rooms as usize);
        }
    }

    #[test]
    fn test_trail_endpoints_respect_margin() {
        let (generator, grid) = generate(4, 80, 45);
        for endpoint in generator.trail_endpoints() {
            assert!(endpoint.x >= 15 && endpoint.x <= 64, "{}", endpoint);
            assert!(endpoint.y >= 15 && endpoint.y <= 29, "{}", endpoint);
            assert!(grid.is_floor(endpoint));
        }
    }

    #[test]
    fn test_trails_are_recorded_contiguously() {
        let (generator, grid) = generate(12, 80, 45);
        for trail in generator.trails() {
            assert_eq!(trail.path.first(), Some(&trail.start));
            assert_eq!(trail.path.last(), Some(&trail.end));
            assert!(trail
                .path
                .windows(2)
                .all(|pair| pair[0].is_orthogonally_adjacent(pair[1])));
            assert!(trail.path.iter().all(|&p| grid.is_floor(p)));
        }
    }

    #[test]
    fn test_rooms_do_not_overlap_and_are_carved() {
        let (generator, grid) = generate(21, 80, 45);
        let rooms = generator.rooms();
        for (i, first) in rooms.iter().enumerate() {
            assert!(first.inner().iter().all(|&p| grid.is_floor(p)));
            for second in &rooms[i + 1..] {
                assert!(!first.intersects(second));
            }
        }
    }

    #[test]
    fn test_regeneration_replaces_metadata() {
        let mut grid = Grid::new(80, 45);
        let mut generator = SeededGenerator::new(TrailDungeonConfig::default(), create_rng(5));
        generator.generate(&mut grid);

        grid.clear();
        generator.generate(&mut grid);
        assert_eq!(generator.trails().len(), 3);
        assert!(generator.rooms().len() <= generator.config.max_rooms as usize);
        assert_eq!(generator.spawn_point(), Some(generator.trails()[0].start));
        assert!(generator.validate(&grid).is_ok());
    }

    #[test]
    fn test_small_grid_places_no_rooms() {
        // The default margin and room sizes do not scale down with the grid.
        let (generator, grid) = generate(3, 6, 6);
        assert!(generator.rooms().is_empty());
        assert_eq!(generator.trails().len(), 3);
        assert!(grid.count(TileType::Floor) > 0);
        assert!(generator.validate(&grid).is_ok());
    }

    #[test]
    fn test_isolated_room_gets_linked() {
        let mut grid = Grid::new(40, 20);
        let mut generator = SeededGenerator::new(TrailDungeonConfig::default(), create_rng(2));
        grid.carve(Position::new(30, 10));

        let room = Room::new(Position::new(2, 2), 4, 4);
        assert!(!SeededGenerator::touches_floor(&grid, &room));
        utils::carve_room(&mut grid, &room);
        generator.link_room(&mut grid, &room, &[Position::new(30, 10)]);

        assert!(utils::validate_connected(&grid).is_ok());
    }

    #[test]
    fn test_room_target_handles_extreme_counts() {
        let config = TrailDungeonConfig {
            min_rooms: u32::MAX - 1,
            max_rooms: u32::MAX,
            ..TrailDungeonConfig::default()
        };
        let mut generator = SeededGenerator::new(config, create_rng(6));
        for _ in 0..20 {
            assert!(generator.room_target() >= u32::MAX - 1);
        }
        assert_eq!(
            generator.room_target().saturating_mul(ROOM_ATTEMPTS_PER_ROOM),
            u32::MAX
        );

        let fixed = TrailDungeonConfig {
            min_rooms: 5,
            max_rooms: 5,
            ..TrailDungeonConfig::default()
        };
        assert_eq!(SeededGenerator::new(fixed, create_rng(6)).room_target(), 5);
    }

    #[test]
    fn test_degenerate_rooms_do_not_become_anchors() {
        // One-tile rooms have no interior, so their centers stay wall.
        let config = TrailDungeonConfig {
            min_rooms: 10,
            max_rooms: 20,
            min_room_size: 1,
            max_room_size: 6,
            ..TrailDungeonConfig::default()
        };
        for seed in 0..40 {
            let (_, grid) = generate_with(config.clone(), seed, 80, 45);
            assert!(
                utils::validate_connected(&grid).is_ok(),
                "seed {} left floor disconnected",
                seed
            );
        }
    }

    #[test]
    fn test_link_room_skips_wall_anchors() {
        let mut grid = Grid::new(40, 20);
        let mut generator = SeededGenerator::new(TrailDungeonConfig::default(), create_rng(2));
        grid.carve(Position::new(30, 10));

        let room = Room::new(Position::new(2, 2), 4, 4);
        utils::carve_room(&mut grid, &room);
        // The nearer anchor is wall, so the link goes to the floor anchor.
        generator.link_room(
            &mut grid,
            &room,
            &[Position::new(10, 4), Position::new(30, 10)],
        );

        assert!(grid.is_floor(Position::new(30, 10)));
        assert!(utils::validate_connected(&grid).is_ok());
    }
}
