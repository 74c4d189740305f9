//! # Utilities Module
//!
//! Grid pathfinding and the injectable random source shared by all generators.

pub mod pathfinding;
pub mod random;

pub use pathfinding::*;
pub use random::*;
