//! # Walkability
//!
//! The transparency/walkability side structure consumed by field-of-view code.
//!
//! A [`Grid`](crate::Grid) notifies its [`Walkability`] collaborator on every tile type
//! change, so the two never disagree.

/// Receives per-cell transparency and walkability updates.
///
/// Implement this to wire a grid into an external field-of-view library.
pub trait Walkability {
    /// Records whether the cell at `(x, y)` lets light through and can be walked on.
    fn set_properties(&mut self, x: i32, y: i32, transparent: bool, walkable: bool);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CellProperties {
    transparent: bool,
    walkable: bool,
}

/// Built-in bitmap implementation of [`Walkability`].
///
/// Starts fully opaque and blocking, matching a freshly constructed all-wall grid.
///
/// # Examples
///
/// ```
/// use delve::{Walkability, WalkabilityMap};
///
/// let mut map = WalkabilityMap::new(10, 10);
/// assert!(!map.is_walkable(3, 3));
///
/// map.set_properties(3, 3, true, true);
/// assert!(map.is_walkable(3, 3));
/// assert!(map.is_transparent(3, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkabilityMap {
    width: u32,
    height: u32,
    cells: Vec<CellProperties>,
}

impl WalkabilityMap {
    /// Creates an opaque, blocking map of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellProperties::default(); (width * height) as usize],
        }
    }

    /// Whether light passes through `(x, y)`. Out-of-range cells are opaque.
    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|c| c.transparent)
    }

    /// Whether `(x, y)` can be walked on. Out-of-range cells block.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|c| c.walkable)
    }

    fn cell(&self, x: i32, y: i32) -> Option<&CellProperties> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.cells.get(x as usize + y as usize * self.width as usize)
    }
}

impl Walkability for WalkabilityMap {
    fn set_properties(&mut self, x: i32, y: i32, transparent: bool, walkable: bool) {
        assert!(
            x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32,
            "walkability update at ({}, {}) outside {}x{} map",
            x,
            y,
            self.width,
            self.height
        );
        let index = x as usize + y as usize * self.width as usize;
        self.cells[index] = CellProperties {
            transparent,
            walkable,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_opaque_and_blocking() {
        let map = WalkabilityMap::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert!(!map.is_transparent(x, y));
                assert!(!map.is_walkable(x, y));
            }
        }
    }

    #[test]
    fn test_set_properties_is_independent_per_cell() {
        let mut map = WalkabilityMap::new(4, 3);
        map.set_properties(1, 2, true, false);

        assert!(map.is_transparent(1, 2));
        assert!(!map.is_walkable(1, 2));
        assert!(!map.is_transparent(2, 1));
    }

    #[test]
    fn test_out_of_range_queries_block() {
        let map = WalkabilityMap::new(4, 3);
        assert!(!map.is_walkable(-1, 0));
        assert!(!map.is_transparent(4, 0));
        assert!(!map.is_walkable(0, 3));
    }

    #[test]
    #[should_panic(expected = "outside 4x3 map")]
    fn test_out_of_range_update_panics() {
        let mut map = WalkabilityMap::new(4, 3);
        map.set_properties(4, 0, true, true);
    }
}
