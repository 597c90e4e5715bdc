//! Shared types for the tilescape workspace.
//!
//! # Invariants
//! - A `TextureVariant` always addresses a cell inside the 5x5 atlas.
//! - A tile's `rise` stays within `[0, 1]`.

mod types;

pub use types::{
    ATLAS_COLUMNS, ATLAS_ROWS, DEFAULT_TILE_COUNT, GRID_SIZE, TextureVariant, Tile, VARIANT_COUNT,
};
