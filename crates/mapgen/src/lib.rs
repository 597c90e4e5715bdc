//! Map generation: connected random growth on a bounded square grid.
//!
//! # Invariants
//! - Every generated tile is reachable from the origin through cardinal
//!   neighbours.
//! - No two tiles share a cell; all tiles lie inside the grid.
//! - Output depends only on the rng sequence.

mod generator;
mod occupancy;

pub use generator::{ConfigurationError, GridGenerator, MAX_GRID_SIZE, ORIGIN, generate};
pub use occupancy::OccupancyIndex;
