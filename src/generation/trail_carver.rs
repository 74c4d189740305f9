//! # Trail Carving
//!
//! Carves a single winding corridor between two points.
//!
//! The carver walks toward its target in straight segments of random length. Each
//! segment picks its axis with odds proportional to the remaining distance on that
//! axis, plus a bonus for an axis whose coordinate sits inside the edge margin, which
//! steers trails away from the map border. A segment may stop early the first time it
//! runs into existing floor, leaving a junction instead of a long parallel overlap.

use crate::world::{Grid, Position, Walkability};
use crate::{DelveError, DelveResult, RandomSource, TrailDungeonConfig};
use serde::{Deserialize, Serialize};

/// Extra axis weight applied while a trail is inside the edge margin on that axis.
pub const EDGE_BONUS: f32 = 3.0;

/// Settings for carving one trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Distance from the map edge the trail tries to keep
    pub edge_margin: i32,
    /// Shortest straight segment
    pub min_length: i32,
    /// Longest straight segment
    pub max_length: i32,
    /// Chance (0.0 to 1.0) that a segment stops on first touching existing floor
    pub intersect_chance: f32,
}

impl TrailConfig {
    /// Rejects values that cannot drive carving.
    pub fn validate(&self) -> DelveResult<()> {
        if self.min_length < 1 || self.min_length > self.max_length {
            return Err(DelveError::InvalidConfig(format!(
                "segment lengths must satisfy 1 <= min <= max, got {}..={}",
                self.min_length, self.max_length
            )));
        }
        if !(0.0..=1.0).contains(&self.intersect_chance) {
            return Err(DelveError::InvalidConfig(format!(
                "intersect_chance must be within 0.0..=1.0, got {}",
                self.intersect_chance
            )));
        }
        Ok(())
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailDungeonConfig::default().trail_config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Carves winding trails into a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrailCarver {
    pub config: TrailConfig,
}

impl TrailCarver {
    pub fn new(config: TrailConfig) -> Self {
        Self { config }
    }

    /// Carves a trail from `start` to `end` and returns every carved position.
    ///
    /// The returned path begins at `start`, ends at `end`, and every consecutive pair
    /// of positions is one orthogonal step apart. Carving always reaches `end`.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `end` lies outside the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{create_rng, Grid, Position, TrailCarver, TrailConfig};
    ///
    /// let mut grid = Grid::new(80, 45);
    /// let mut rng = create_rng(3);
    /// let carver = TrailCarver::new(TrailConfig::default());
    ///
    /// let (start, end) = (Position::new(20, 20), Position::new(60, 30));
    /// let path = carver.generate_trail(&mut grid, start, end, &mut rng);
    /// assert_eq!(path.first(), Some(&Position::new(20, 20)));
    /// assert_eq!(path.last(), Some(&Position::new(60, 30)));
    /// ```
    pub fn generate_trail<W: Walkability, R: RandomSource + ?Sized>(
        &self,
        grid: &mut Grid<W>,
        start: Position,
        end: Position,
        rng: &mut R,
    ) -> Vec<Position> {
        assert!(
            grid.is_in_bounds(end),
            "trail end {} outside {}x{} grid",
            end,
            grid.width(),
            grid.height()
        );

        let mut path = vec![start];
        grid.carve(start);
        let mut current = start;

        while current.chebyshev_distance(end) > 1 {
            let axis = self.choose_axis(grid, current, end, rng);
            // Every segment advances at least one tile, so carving always terminates.
            let length = rng
                .next_int(self.config.min_length, self.config.max_length)
                .max(1);
            let mut touched_floor = false;

            for _ in 0..length {
                let remaining = match axis {
                    Axis::Horizontal => end.x - current.x,
                    Axis::Vertical => end.y - current.y,
                };
                if remaining == 0 {
                    break;
                }

                let step = match axis {
                    Axis::Horizontal => Position::new(remaining.signum(), 0),
                    Axis::Vertical => Position::new(0, remaining.signum()),
                };
                let next = Self::clamp(grid, current + step);
                if next == current {
                    break;
                }

                current = next;
                let was_floor = !grid.carve(current);
                path.push(current);

                if current.chebyshev_distance(end) <= 1 {
                    break;
                }
                if was_floor && !touched_floor {
                    touched_floor = true;
                    if rng.next_float(0.0, 1.0) < self.config.intersect_chance {
                        break;
                    }
                }
            }
        }

        // Within one tile of the target; a diagonal neighbour needs a corner step.
        if current.x != end.x && current.y != end.y {
            let corner = Position::new(end.x, current.y);
            grid.carve(corner);
            path.push(corner);
            current = corner;
        }
        if current != end {
            grid.carve(end);
            path.push(end);
        }

        log::trace!("trail {} -> {}: {} tiles", start, end, path.len());
        path
    }

    /// Picks the axis for the next segment, weighted by remaining distance.
    fn choose_axis<W: Walkability, R: RandomSource + ?Sized>(
        &self,
        grid: &Grid<W>,
        current: Position,
        end: Position,
        rng: &mut R,
    ) -> Axis {
        let dx = end.x - current.x;
        let dy = end.y - current.y;
        if dx == 0 {
            return Axis::Vertical;
        }
        if dy == 0 {
            return Axis::Horizontal;
        }

        let mut horizontal_weight = dx.abs() as f32;
        let mut vertical_weight = dy.abs() as f32;
        if self.near_edge(current.x, grid.width()) {
            horizontal_weight += EDGE_BONUS;
        }
        if self.near_edge(current.y, grid.height()) {
            vertical_weight += EDGE_BONUS;
        }

        let roll = rng.next_float(0.0, horizontal_weight + vertical_weight);
        if roll < horizontal_weight {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    fn near_edge(&self, coordinate: i32, extent: u32) -> bool {
        coordinate < self.config.edge_margin
            || coordinate >= extent as i32 - self.config.edge_margin
    }

    fn clamp<W: Walkability>(grid: &Grid<W>, pos: Position) -> Position {
        Position::new(
            pos.x.clamp(0, grid.width() as i32 - 1),
            pos.y.clamp(0, grid.height() as i32 - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::create_rng;
    use crate::TileType;

    fn assert_valid_trail(path: &[Position], start: Position, end: Position) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            assert!(
                pair[0].is_orthogonally_adjacent(pair[1]),
                "{} and {} are not adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_trail_reaches_target() {
        let mut grid = Grid::new(80, 45);
        let carver = TrailCarver::default();
        let start = Position::new(20, 20);
        let end = Position::new(60, 30);

        for seed in 0..20 {
            grid.clear();
            let mut rng = create_rng(seed);
            let path = carver.generate_trail(&mut grid, start, end, &mut rng);

            assert_valid_trail(&path, start, end);
            assert!(path.len() as u32 >= start.chebyshev_distance(end));
            assert!(path.iter().all(|&p| grid.is_floor(p)));
        }
    }

    #[test]
    fn test_trail_to_itself() {
        let mut grid = Grid::new(10, 10);
        let mut rng = create_rng(1);
        let pos = Position::new(4, 4);

        let path = TrailCarver::default().generate_trail(&mut grid, pos, pos, &mut rng);
        assert_eq!(path, vec![pos]);
        assert!(grid.is_floor(pos));
    }

    #[test]
    fn test_diagonal_neighbour_gets_corner() {
        let mut grid = Grid::new(10, 10);
        let mut rng = create_rng(1);
        let start = Position::new(4, 4);
        let end = Position::new(5, 5);

        let path = TrailCarver::default().generate_trail(&mut grid, start, end, &mut rng);
        assert_eq!(path, vec![start, Position::new(5, 4), end]);
        assert_eq!(grid.count(TileType::Floor), 3);
    }

    #[test]
    fn test_trail_crossing_existing_floor() {
        let mut grid = Grid::new(40, 40);
        // A wall of floor the trail has to cross.
        for y in 0..40 {
            grid.set_tile_type(Position::new(20, y), TileType::Floor);
        }
        let carver = TrailCarver::new(TrailConfig {
            edge_margin: 2,
            min_length: 2,
            max_length: 6,
            intersect_chance: 1.0,
        });
        let start = Position::new(5, 8);
        let end = Position::new(35, 30);

        let mut rng = create_rng(8);
        let path = carver.generate_trail(&mut grid, start, end, &mut rng);
        assert_valid_trail(&path, start, end);
        assert!(path.iter().any(|p| p.x == 20));
    }

    #[test]
    fn test_trail_hugging_the_edge() {
        let mut grid = Grid::new(30, 30);
        let carver = TrailCarver::new(TrailConfig {
            edge_margin: 5,
            min_length: 1,
            max_length: 4,
            intersect_chance: 0.0,
        });
        let start = Position::new(0, 0);
        let end = Position::new(29, 29);

        let mut rng = create_rng(4);
        let path = carver.generate_trail(&mut grid, start, end, &mut rng);
        assert_valid_trail(&path, start, end);
        assert_eq!(path.len() as u32, start.manhattan_distance(end) + 1);
    }

    #[test]
    fn test_trail_config_validation() {
        assert!(TrailConfig::default().validate().is_ok());

        let mut config = TrailConfig::default();
        config.max_length = config.min_length - 1;
        assert!(config.validate().is_err());

        let mut config = TrailConfig::default();
        config.intersect_chance = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_length_segments_still_reach_target() {
        let config = TrailConfig {
            min_length: 0,
            max_length: 0,
            ..TrailConfig::default()
        };
        assert!(config.validate().is_err());

        let mut grid = Grid::new(80, 45);
        let start = Position::new(20, 20);
        let end = Position::new(60, 30);
        let carver = TrailCarver::new(config);
        let path = carver.generate_trail(&mut grid, start, end, &mut create_rng(1));

        assert_valid_trail(&path, start, end);
        assert!(grid.is_floor(end));
    }
}
