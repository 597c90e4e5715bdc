use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Side length of the square map grid.
pub const GRID_SIZE: u32 = 8;

/// Number of tiles placed on a fresh map.
pub const DEFAULT_TILE_COUNT: usize = 30;

/// Columns of the front-face texture atlas.
pub const ATLAS_COLUMNS: u8 = 5;

/// Rows of the front-face texture atlas.
pub const ATLAS_ROWS: u8 = 5;

/// Number of distinct atlas cells a tile can show.
pub const VARIANT_COUNT: u8 = ATLAS_COLUMNS * ATLAS_ROWS;

/// Index of one cell of the front-face texture atlas, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TextureVariant(u8);

impl TextureVariant {
    /// Top-left atlas cell, shown by the origin tile.
    pub const FIRST: TextureVariant = TextureVariant(0);

    /// Returns `None` when `index` does not address an atlas cell.
    pub fn new(index: u8) -> Option<Self> {
        (index < VARIANT_COUNT).then_some(Self(index))
    }

    /// Variant for `index` modulo the atlas size.
    pub fn wrapping(index: u8) -> Self {
        Self(index % VARIANT_COUNT)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Atlas column, `index % 5`.
    pub fn column(self) -> u8 {
        self.0 % ATLAS_COLUMNS
    }

    /// Atlas row, `index / 5`.
    pub fn row(self) -> u8 {
        self.0 / ATLAS_COLUMNS
    }
}

impl TryFrom<u8> for TextureVariant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("texture variant {value} out of range 0..{VARIANT_COUNT}"))
    }
}

impl From<TextureVariant> for u8 {
    fn from(variant: TextureVariant) -> Self {
        variant.0
    }
}

/// One occupied grid cell.
///
/// `rise` drives the reveal animation: 1.0 is fully unrisen, 0.0 is resting
/// flat. It only ever decreases and stays at 0 once reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub variant: TextureVariant,
    pub rise: f32,
}

impl Tile {
    /// A tile resting flat at `(x, y)`.
    pub fn new(x: u32, y: u32, variant: TextureVariant) -> Self {
        Self {
            x,
            y,
            variant,
            rise: 0.0,
        }
    }

    /// Set `rise` for a reveal that has run for `elapsed` out of `duration`.
    ///
    /// `elapsed` is the total since the reveal began, not a per-tick delta, so
    /// rise is exactly 0 once `elapsed >= duration`. Never raises `rise`.
    pub fn reveal(&mut self, elapsed: Duration, duration: Duration) {
        let remaining = if elapsed >= duration {
            0.0
        } else {
            (1.0 - elapsed.as_secs_f64() / duration.as_secs_f64()) as f32
        };
        self.rise = self.rise.min(remaining).max(0.0);
    }

    pub fn is_risen(&self) -> bool {
        self.rise <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_bounds() {
        assert!(TextureVariant::new(0).is_some());
        assert!(TextureVariant::new(24).is_some());
        assert!(TextureVariant::new(25).is_none());
        assert!(TextureVariant::try_from(200).is_err());
        assert_eq!(TextureVariant::wrapping(27).index(), 2);
    }

    #[test]
    fn variant_column_and_row() {
        let v = TextureVariant::new(12).unwrap();
        assert_eq!((v.column(), v.row()), (2, 2));
        let v = TextureVariant::new(7).unwrap();
        assert_eq!((v.column(), v.row()), (2, 1));
        let v = TextureVariant::new(24).unwrap();
        assert_eq!((v.column(), v.row()), (4, 4));
    }

    fn unrisen() -> Tile {
        Tile {
            rise: 1.0,
            ..Tile::new(0, 0, TextureVariant::FIRST)
        }
    }

    const REVEAL: Duration = Duration::from_secs(2);

    #[test]
    fn rise_decays_and_clamps() {
        let mut tile = unrisen();
        tile.reveal(Duration::from_secs(1), REVEAL);
        assert_eq!(tile.rise, 0.5);
        tile.reveal(Duration::from_millis(2500), REVEAL);
        assert_eq!(tile.rise, 0.0);
        assert!(tile.is_risen());
        tile.reveal(Duration::from_millis(3500), REVEAL);
        assert_eq!(tile.rise, 0.0);
    }

    #[test]
    fn rise_is_exactly_zero_when_steps_sum_to_duration() {
        for (steps, step) in [(40, 50), (200, 10), (60, 33)] {
            let step = Duration::from_millis(step);
            let mut tile = unrisen();
            let mut elapsed = Duration::ZERO;
            for _ in 0..steps {
                elapsed += step;
                tile.reveal(elapsed, REVEAL);
            }
            if elapsed >= REVEAL {
                assert_eq!(tile.rise, 0.0, "{steps} x {step:?}");
            } else {
                assert!(tile.rise > 0.0, "{steps} x {step:?}");
            }
        }
    }

    #[test]
    fn reveal_never_raises_rise() {
        let mut tile = unrisen();
        tile.reveal(Duration::from_millis(1500), REVEAL);
        let settled = tile.rise;
        tile.reveal(Duration::from_millis(500), REVEAL);
        assert_eq!(tile.rise, settled);

        let mut flat = Tile::new(2, 3, TextureVariant::FIRST);
        flat.reveal(Duration::ZERO, REVEAL);
        assert_eq!(flat.rise, 0.0);
    }

    #[test]
    fn variant_serde_rejects_out_of_range() {
        let ok: TextureVariant = serde_json::from_str("4").unwrap();
        assert_eq!(ok.index(), 4);
        assert!(serde_json::from_str::<TextureVariant>("25").is_err());
    }
}
