//! # Rooms-and-Corridors Generation
//!
//! Classic room placement chained by L-shaped tunnels.
//!
//! This generator creates levels by:
//! 1. Attempting `max_rooms` random room placements, rejecting overlaps
//! 2. Carving each accepted room's interior
//! 3. Joining each new room's center to the previous room's center with one
//!    L-shaped tunnel
//!
//! The result is a connected chain rather than a mesh: cheap, and weaker than the
//! guarantee [`TrailDungeonGenerator`](crate::TrailDungeonGenerator) makes.

use super::utils;
use crate::world::{Grid, Position, Walkability};
use crate::{Corridor, DelveResult, Generator, RandomSource, Room, RoomsAndCorridorsConfig};

/// Room-and-corridor level generator.
///
/// # Examples
///
/// ```
/// use delve::{create_rng, Generator, Grid, RoomsAndCorridorsConfig, RoomsAndCorridorsGenerator};
///
/// let mut grid = Grid::new(80, 45);
/// let mut generator =
///     RoomsAndCorridorsGenerator::new(RoomsAndCorridorsConfig::default(), create_rng(4));
/// generator.generate(&mut grid);
///
/// assert!(!generator.rooms().is_empty());
/// assert_eq!(generator.corridors().len(), generator.rooms().len() - 1);
/// ```
#[derive(Debug, Clone)]
pub struct RoomsAndCorridorsGenerator<R: RandomSource> {
    /// Tuning parameters
    pub config: RoomsAndCorridorsConfig,
    rng: R,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
}

impl<R: RandomSource> RoomsAndCorridorsGenerator<R> {
    /// Creates a generator that draws all randomness from `rng`.
    pub fn new(config: RoomsAndCorridorsConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            rooms: Vec::new(),
            corridors: Vec::new(),
        }
    }

    /// Tunnels carved by the most recent generation, one per room after the first.
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Attempts one room placement. Returns `None` on a size or overlap rejection.
    fn try_place_room<W: Walkability>(&mut self, grid: &Grid<W>) -> Option<Room> {
        let room = utils::random_room(
            grid,
            self.config.min_room_size,
            self.config.max_room_size,
            &mut self.rng,
        )?;

        if self.rooms.iter().any(|existing| room.intersects(existing)) {
            return None;
        }
        Some(room)
    }

    /// Carves an L-shaped corridor between two points.
    ///
    /// The corner is chosen uniformly between going horizontal first and going
    /// vertical first.
    fn carve_l_corridor<W: Walkability>(
        &mut self,
        grid: &mut Grid<W>,
        from: Position,
        to: Position,
    ) -> Corridor {
        let horizontal_first = self.rng.next_int(0, 1) == 1;
        let corner = if horizontal_first {
            Position::new(to.x, from.y)
        } else {
            Position::new(from.x, to.y)
        };

        let corridor = Corridor { from, corner, to };
        utils::carve_route(grid, &corridor.positions());
        corridor
    }
}

impl<R: RandomSource> Generator for RoomsAndCorridorsGenerator<R> {
    fn generate<W: Walkability>(&mut self, grid: &mut Grid<W>) {
        self.rooms.clear();
        self.corridors.clear();

        for _ in 0..self.config.max_rooms {
            let Some(room) = self.try_place_room(grid) else {
                continue;
            };

            utils::carve_room(grid, &room);
            if let Some(previous) = self.rooms.last() {
                let from = previous.center();
                let corridor = self.carve_l_corridor(grid, from, room.center());
                self.corridors.push(corridor);
            }
            self.rooms.push(room);
        }

        log::debug!(
            "placed {} rooms and {} corridors from {} attempts",
            self.rooms.len(),
            self.corridors.len(),
            self.config.max_rooms
        );
    }

    fn validate<W: Walkability>(&self, grid: &Grid<W>) -> DelveResult<()> {
        utils::validate_level(grid)?;
        utils::validate_no_overlap(&self.rooms)?;
        utils::validate_chain(grid, &self.rooms)
    }

    fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn spawn_point(&self) -> Option<Position> {
        self.rooms.first().map(Room::center)
    }

    fn generator_type(&self) -> &'static str {
        "RoomsAndCorridorsGenerator"
    }
}
