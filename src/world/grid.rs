//! # Level Grid
//!
//! The flat tile array a level is carved into.
//!
//! Tiles are stored row-major and indexed `x + y * width`. Every tile type change goes
//! through [`Grid::set_tile_type`], which also updates the grid's [`Walkability`]
//! collaborator. Coordinates outside the grid are a caller bug: queries and mutators
//! panic instead of clamping.

use super::{Position, Walkability, WalkabilityMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of tiles a level is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid rock, opaque and blocking
    Wall,
    /// Open floor, transparent and walkable
    Floor,
    /// No tile at all; treated like a wall by every consumer
    Void,
}

impl TileType {
    /// Checks if this tile type allows movement.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor)
    }

    /// Checks if this tile type lets light through.
    pub fn is_transparent(self) -> bool {
        matches!(self, TileType::Floor)
    }

    /// Gets the ASCII character used when printing a level.
    pub fn glyph(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Void => ' ',
        }
    }
}

/// A single tile on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// What the tile is made of
    pub tile_type: TileType,
    /// Whether the player has seen this tile
    pub explored: bool,
}

impl Tile {
    /// Creates an unexplored tile of the given type.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            explored: false,
        }
    }

    /// Creates an unexplored wall tile.
    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    /// Creates an unexplored floor tile.
    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }
}

/// A fixed-size level layout.
///
/// A grid is constructed once per level in an all-wall, unexplored state. Generators
/// mutate it in place and [`Grid::clear`] resets it for the next level.
///
/// # Examples
///
/// ```
/// use delve::{Grid, Position, TileType};
///
/// let mut grid = Grid::new(20, 10);
/// assert!(grid.is_wall(Position::new(3, 3)));
///
/// grid.set_tile_type(Position::new(3, 3), TileType::Floor);
/// assert!(grid.walkability().is_walkable(3, 3));
/// ```
#[derive(Debug, Clone)]
pub struct Grid<W: Walkability = WalkabilityMap> {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    walkability: W,
}

impl Grid<WalkabilityMap> {
    /// Creates an all-wall grid backed by the built-in [`WalkabilityMap`].
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_walkability(width, height, WalkabilityMap::new(width, height))
    }
}

impl<W: Walkability> Grid<W> {
    /// Creates an all-wall grid that mirrors tile changes into `walkability`.
    ///
    /// Every cell of `walkability` is immediately marked opaque and blocking.
    pub fn with_walkability(width: u32, height: u32, walkability: W) -> Self {
        let mut grid = Self {
            width,
            height,
            tiles: vec![Tile::wall(); (width * height) as usize],
            walkability,
        };
        grid.clear();
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The walkability collaborator kept in sync with this grid.
    pub fn walkability(&self) -> &W {
        &self.walkability
    }

    /// Checks if a position lies on the grid.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.is_in_bounds(pos),
            "position {} outside {}x{} grid",
            pos,
            self.width,
            self.height
        );
        pos.x as usize + pos.y as usize * self.width as usize
    }

    /// Gets the tile at a position.
    pub fn tile(&self, pos: Position) -> &Tile {
        &self.tiles[self.index(pos)]
    }

    pub fn tile_type(&self, pos: Position) -> TileType {
        self.tile(pos).tile_type
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile_type(pos) == TileType::Wall
    }

    pub fn is_floor(&self, pos: Position) -> bool {
        self.tile_type(pos) == TileType::Floor
    }

    /// Sets a tile's type and updates the walkability collaborator.
    ///
    /// This is the only way tile types change.
    pub fn set_tile_type(&mut self, pos: Position, tile_type: TileType) {
        let index = self.index(pos);
        self.tiles[index].tile_type = tile_type;
        self.walkability.set_properties(
            pos.x,
            pos.y,
            tile_type.is_transparent(),
            tile_type.is_passable(),
        );
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.tile(pos).explored
    }

    pub fn set_explored(&mut self, pos: Position, explored: bool) {
        let index = self.index(pos);
        self.tiles[index].explored = explored;
    }

    /// Turns a wall or void tile into floor. Returns whether anything changed.
    pub fn carve(&mut self, pos: Position) -> bool {
        if self.is_floor(pos) {
            return false;
        }
        self.set_tile_type(pos, TileType::Floor);
        true
    }

    /// Resets every tile to an unexplored wall.
    pub fn clear(&mut self) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                self.set_tile_type(pos, TileType::Wall);
                self.set_explored(pos, false);
            }
        }
    }

    /// Iterates over every position on the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Gets every floor position in row-major order.
    pub fn floor_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_floor(p)).collect()
    }

    /// Counts tiles of a given type.
    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.tile_type == tile_type)
            .count()
    }

    /// The raw row-major tile slice.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl<W: Walkability> fmt::Display for Grid<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            let line: String = row.iter().map(|tile| tile.tile_type.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every walkability update for inspection.
    #[derive(Debug, Default)]
    struct RecordingWalkability {
        updates: Vec<(i32, i32, bool, bool)>,
    }

    impl Walkability for RecordingWalkability {
        fn set_properties(&mut self, x: i32, y: i32, transparent: bool, walkable: bool) {
            self.updates.push((x, y, transparent, walkable));
        }
    }

    #[test]
    fn test_new_grid_is_all_unexplored_wall() {
        let grid = Grid::new(8, 5);
        assert_eq!(grid.tiles().len(), 40);
        assert_eq!(grid.count(TileType::Wall), 40);
        assert!(grid.positions().all(|p| !grid.is_explored(p)));
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(8, 5);
        assert!(grid.is_in_bounds(Position::new(0, 0)));
        assert!(grid.is_in_bounds(Position::new(7, 4)));
        assert!(!grid.is_in_bounds(Position::new(8, 4)));
        assert!(!grid.is_in_bounds(Position::new(0, 5)));
        assert!(!grid.is_in_bounds(Position::new(-1, 0)));
    }

    #[test]
    fn test_set_tile_type_updates_walkability() {
        let mut grid = Grid::new(8, 5);
        let pos = Position::new(2, 3);

        grid.set_tile_type(pos, TileType::Floor);
        assert_eq!(grid.tile_type(pos), TileType::Floor);
        assert!(grid.walkability().is_walkable(2, 3));
        assert!(grid.walkability().is_transparent(2, 3));

        grid.set_tile_type(pos, TileType::Wall);
        assert!(grid.is_wall(pos));
        assert!(!grid.walkability().is_walkable(2, 3));
        assert!(!grid.walkability().is_transparent(2, 3));

        grid.set_tile_type(pos, TileType::Void);
        assert!(!grid.is_wall(pos));
        assert!(!grid.walkability().is_walkable(2, 3));
    }

    #[test]
    fn test_custom_walkability_sees_every_change() {
        let mut grid = Grid::with_walkability(3, 2, RecordingWalkability::default());
        // Construction marks every cell opaque and blocking.
        assert_eq!(grid.walkability().updates.len(), 6);
        assert!(grid.walkability().updates.iter().all(|u| !u.2 && !u.3));

        grid.set_tile_type(Position::new(1, 1), TileType::Floor);
        assert_eq!(grid.walkability().updates.last(), Some(&(1, 1, true, true)));
    }

    #[test]
    fn test_carve_reports_change() {
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(1, 1);
        assert!(grid.carve(pos));
        assert!(!grid.carve(pos));
        assert_eq!(grid.floor_positions(), vec![pos]);
    }

    #[test]
    fn test_explored_flag() {
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(2, 1);
        grid.set_explored(pos, true);
        assert!(grid.is_explored(pos));
        assert!(grid.is_wall(pos));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = Grid::new(4, 4);
        grid.set_tile_type(Position::new(1, 1), TileType::Floor);
        grid.set_explored(Position::new(1, 1), true);

        grid.clear();
        assert_eq!(grid.count(TileType::Wall), 16);
        assert!(!grid.is_explored(Position::new(1, 1)));
        assert!(!grid.walkability().is_walkable(1, 1));
    }

    #[test]
    fn test_display_renders_rows() {
        let mut grid = Grid::new(3, 2);
        grid.set_tile_type(Position::new(1, 0), TileType::Floor);
        grid.set_tile_type(Position::new(2, 1), TileType::Void);
        assert_eq!(grid.to_string(), "#.#\n## \n");
    }

    #[test]
    #[should_panic(expected = "outside 8x5 grid")]
    fn test_out_of_bounds_query_panics() {
        let grid = Grid::new(8, 5);
        grid.is_wall(Position::new(8, 0));
    }

    #[test]
    #[should_panic(expected = "outside 8x5 grid")]
    fn test_out_of_bounds_mutation_panics() {
        let mut grid = Grid::new(8, 5);
        grid.set_tile_type(Position::new(0, -1), TileType::Floor);
    }
}
