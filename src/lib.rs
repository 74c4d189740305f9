//! # Delve
//!
//! Procedural dungeon generation for tile-based roguelikes.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a small number of concepts:
//!
//! - **World**: the tile [`Grid`] a level is carved into, plus the [`Walkability`]
//!   collaborator that mirrors every tile change for field-of-view code
//! - **Generation**: two independent level generators behind the [`Generator`] trait.
//!   [`TrailDungeonGenerator`] carves winding trails, joins every trail endpoint and
//!   overlays rooms; [`RoomsAndCorridorsGenerator`] chains rooms with L-shaped tunnels
//! - **Utilities**: the greedy best-first [`PathFinder`] and the injectable
//!   [`RandomSource`] every generator draws from
//!
//! ## Reproducibility
//!
//! All randomness flows through the [`RandomSource`] handed to a generator at
//! construction. Seeding that source (for example with [`utils::create_rng`]) makes
//! generation fully deterministic.

pub mod generation;
pub mod utils;
pub mod world;

// Core module re-exports
pub use generation::*;
pub use utils::*;
pub use world::*;

/// Core error type for the Delve generation engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values cannot produce a level
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generated level failed validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation defaults.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 45;

    /// Seed used by the command line tool when none is given
    pub const DEFAULT_SEED: u64 = 12345;
}
