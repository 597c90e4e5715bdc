use rand::Rng;
use thiserror::Error;
use tilescape_common::{TextureVariant, Tile, VARIANT_COUNT};

use crate::occupancy::OccupancyIndex;

/// Cell of the first tile of every map.
pub const ORIGIN: (u32, u32) = (0, 0);

/// Largest accepted grid side. The occupancy index holds `size * size` cells.
pub const MAX_GRID_SIZE: u32 = 1024;

/// Attempts allowed per requested tile before generation gives up.
const ATTEMPTS_PER_TILE: usize = 10_000;

/// Invalid generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("requested {requested} tiles but a {size}x{size} grid only holds {capacity}")]
    CapacityExceeded {
        requested: usize,
        size: u32,
        capacity: usize,
    },
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size {size} exceeds the maximum of {max}")]
    GridTooLarge { size: u32, max: u32 },
    #[error("tile count must be at least 1")]
    NoTiles,
    #[error("placed {placed} of {target} tiles before running out of {attempts} attempts")]
    AttemptsExhausted {
        placed: usize,
        target: usize,
        attempts: usize,
    },
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    fn offset(self) -> (i64, i64) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, 1),
            Direction::South => (0, -1),
        }
    }
}

/// Grows a connected set of tiles outward from [`ORIGIN`].
///
/// Each attempt picks a random placed tile and a random cardinal direction;
/// the neighbour cell is accepted when it is inside the grid and free.
/// Rejected attempts are simply dropped, so consecutive attempts are
/// independent. Because every tile is attached to an existing one the
/// result is always edge-connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGenerator {
    pub grid_size: u32,
    pub target_count: usize,
    /// Upper bound on attempts (accepted or rejected) for one map.
    pub max_attempts: usize,
}

impl GridGenerator {
    pub fn new(grid_size: u32, target_count: usize) -> Self {
        Self {
            grid_size,
            target_count,
            max_attempts: target_count.saturating_mul(ATTEMPTS_PER_TILE),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Check the parameters without generating anything.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.grid_size == 0 {
            return Err(ConfigurationError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigurationError::GridTooLarge {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.target_count == 0 {
            return Err(ConfigurationError::NoTiles);
        }
        let capacity = self.grid_size as usize * self.grid_size as usize;
        if self.target_count > capacity {
            return Err(ConfigurationError::CapacityExceeded {
                requested: self.target_count,
                size: self.grid_size,
                capacity,
            });
        }
        Ok(())
    }

    /// Generate a map. All returned tiles start with `rise = 1`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Tile>, ConfigurationError> {
        self.validate()?;
        let _span = tracing::debug_span!(
            "generate_map",
            grid_size = self.grid_size,
            target = self.target_count
        )
        .entered();

        let mut index = OccupancyIndex::new(self.grid_size);
        let mut tiles = Vec::with_capacity(self.target_count);
        tiles.push(Tile::new(ORIGIN.0, ORIGIN.1, TextureVariant::FIRST));
        index.insert(ORIGIN.0, ORIGIN.1, 0);

        let mut attempts = 0usize;
        while tiles.len() < self.target_count {
            if attempts >= self.max_attempts {
                return Err(ConfigurationError::AttemptsExhausted {
                    placed: tiles.len(),
                    target: self.target_count,
                    attempts,
                });
            }
            attempts += 1;

            let parent = tiles[rng.gen_range(0..tiles.len())];
            let (dx, dy) = Direction::ALL[rng.gen_range(0..Direction::ALL.len())].offset();
            let (cx, cy) = (i64::from(parent.x) + dx, i64::from(parent.y) + dy);
            if !index.contains(cx, cy) {
                tracing::trace!(cx, cy, "candidate outside grid");
                continue;
            }
            // In range after the bounds check above.
            let (x, y) = (cx as u32, cy as u32);
            if index.is_occupied(x, y) {
                tracing::trace!(x, y, "candidate occupied");
                continue;
            }

            let variant = TextureVariant::wrapping(rng.gen_range(0..VARIANT_COUNT));
            index.insert(x, y, tiles.len());
            tiles.push(Tile::new(x, y, variant));
        }

        for tile in &mut tiles {
            tile.rise = 1.0;
        }

        tracing::debug!(placed = tiles.len(), attempts, "map generated");
        Ok(tiles)
    }
}

/// Generate `target_count` tiles on a `grid_size` grid with the default
/// attempt cap.
pub fn generate<R: Rng + ?Sized>(
    grid_size: u32,
    target_count: usize,
    rng: &mut R,
) -> Result<Vec<Tile>, ConfigurationError> {
    GridGenerator::new(grid_size, target_count).generate(rng)
}
