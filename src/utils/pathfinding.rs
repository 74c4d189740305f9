//! # Pathfinding
//!
//! Greedy best-first search over the 4-connected tile grid.
//!
//! The frontier is ordered purely by Manhattan distance to the goal, with no
//! accumulated cost, so routes are plausible rather than shortest. Neighbour order is
//! shuffled on every expansion; this is what gives carved connecting tunnels their
//! irregular shape.

use crate::utils::random::{shuffle, RandomSource};
use crate::world::{Direction, Grid, Position, Walkability};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Marks the start cell. Positive, so it can never equal a direction code.
const START_SENTINEL: i32 = 1;

/// Cell value for "not visited yet".
const UNVISITED: i32 = 0;

/// Packs a one-step delta into a strictly negative code.
fn encode_delta(delta: Position) -> i32 {
    -((delta.x + 2) * 4 + (delta.y + 2))
}

/// Inverse of [`encode_delta`]. Returns `None` for the sentinel and unvisited cells.
fn decode_delta(code: i32) -> Option<Position> {
    if code >= 0 {
        return None;
    }
    let packed = -code;
    let delta = Position::new(packed / 4 - 2, packed % 4 - 2);
    Direction::from_delta(delta).map(Direction::to_delta)
}

/// Per-search visited set and parent links, packed one `i32` per cell.
///
/// `0` means unvisited. Any other value means visited; negative values also encode the
/// step taken to reach the cell, so subtracting the decoded step yields the parent.
#[derive(Debug, Clone)]
pub struct PathfindingContext {
    width: u32,
    cells: Vec<i32>,
}

impl PathfindingContext {
    /// Creates an all-unvisited context for a grid of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![UNVISITED; (width * height) as usize],
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.x as usize + pos.y as usize * self.width as usize
    }

    pub fn is_visited(&self, pos: Position) -> bool {
        self.cells[self.index(pos)] != UNVISITED
    }

    /// Marks the search origin. Backtracking stops here.
    pub fn mark_start(&mut self, pos: Position) {
        let index = self.index(pos);
        self.cells[index] = START_SENTINEL;
    }

    /// Marks `pos` as reached by stepping in `direction` from its parent.
    pub fn mark_reached(&mut self, pos: Position, direction: Direction) {
        let index = self.index(pos);
        self.cells[index] = encode_delta(direction.to_delta());
    }

    /// Gets the cell `pos` was reached from, or `None` at the start or unvisited cells.
    pub fn parent_of(&self, pos: Position) -> Option<Position> {
        decode_delta(self.cells[self.index(pos)]).map(|delta| pos - delta)
    }
}

/// Which cells a search may step through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passability {
    /// Only floor tiles; the right choice for movement and game logic
    #[default]
    FloorOnly,
    /// Any in-bounds tile; used to plan tunnels that will be carved afterwards
    Carving,
}

/// Frontier entry ranked by heuristic only.
#[derive(Debug, Clone)]
struct FrontierNode {
    position: Position,
    heuristic: u32,
    sequence: u64,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse heuristic ordering for min-heap behavior in BinaryHeap;
        // among equal heuristics the most recently discovered node wins.
        other
            .heuristic
            .cmp(&self.heuristic)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Greedy best-first grid search.
///
/// # Examples
///
/// ```
/// use delve::{create_rng, Grid, PathFinder, Position, TileType};
///
/// let mut grid = Grid::new(10, 3);
/// for x in 1..9 {
///     grid.set_tile_type(Position::new(x, 1), TileType::Floor);
/// }
///
/// let mut rng = create_rng(1);
/// let (start, end) = (Position::new(1, 1), Position::new(8, 1));
/// let path = PathFinder::new().find_path(&grid, start, end, &mut rng);
/// assert_eq!(path.len(), 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathFinder {
    /// Which cells the search may traverse
    pub passability: Passability,
}

impl PathFinder {
    /// Creates a path finder that only walks on floor.
    pub fn new() -> Self {
        Self {
            passability: Passability::FloorOnly,
        }
    }

    /// Creates a path finder that may route through walls, for tunnel planning.
    pub fn carving() -> Self {
        Self {
            passability: Passability::Carving,
        }
    }

    fn can_enter<W: Walkability>(&self, grid: &Grid<W>, pos: Position) -> bool {
        match self.passability {
            Passability::FloorOnly => grid.is_floor(pos),
            Passability::Carving => true,
        }
    }

    /// Finds a route from `start` to `end`, both inclusive.
    ///
    /// Returns `[start]` when the endpoints coincide, and an empty vector when either
    /// endpoint is out of bounds or not floor, or when no route exists.
    pub fn find_path<W: Walkability, R: RandomSource + ?Sized>(
        &self,
        grid: &Grid<W>,
        start: Position,
        end: Position,
        rng: &mut R,
    ) -> Vec<Position> {
        if !grid.is_in_bounds(start) || !grid.is_in_bounds(end) {
            return Vec::new();
        }
        if !grid.is_floor(start) || !grid.is_floor(end) {
            return Vec::new();
        }
        if start == end {
            return vec![start];
        }

        let mut context = PathfindingContext::new(grid.width(), grid.height());
        let mut frontier = BinaryHeap::new();
        let mut sequence = 0u64;

        context.mark_start(start);
        frontier.push(FrontierNode {
            position: start,
            heuristic: start.manhattan_distance(end),
            sequence,
        });

        while let Some(node) = frontier.pop() {
            let current = node.position;
            if current == end {
                let path = Self::reconstruct(&context, end);
                log::trace!("path {} -> {}: {} tiles", start, end, path.len());
                return path;
            }

            let mut directions = Direction::all();
            shuffle(&mut directions, rng);

            for direction in directions {
                let neighbor = current.step(direction);
                if !grid.is_in_bounds(neighbor) || context.is_visited(neighbor) {
                    continue;
                }
                if !self.can_enter(grid, neighbor) {
                    continue;
                }

                context.mark_reached(neighbor, direction);
                sequence += 1;
                frontier.push(FrontierNode {
                    position: neighbor,
                    heuristic: neighbor.manhattan_distance(end),
                    sequence,
                });
            }
        }

        log::trace!("no path {} -> {}", start, end);
        Vec::new()
    }

    /// Walks parent links back from `end` and returns the route start-first.
    fn reconstruct(context: &PathfindingContext, end: Position) -> Vec<Position> {
        let mut path = vec![end];
        let mut current = end;
        while let Some(parent) = context.parent_of(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}
