use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tilescape_assets::AssetPaths;
use tilescape_common::{DEFAULT_TILE_COUNT, GRID_SIZE};
use tilescape_mapgen::GridGenerator;
use tilescape_render::Projection;

use crate::error::SessionError;

/// Session settings. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grid_size: u32,
    pub tile_count: usize,
    /// Fixed map seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Placement attempt cap; scales with `tile_count` when absent.
    pub max_attempts: Option<usize>,
    /// Seconds for a tile to flip from unrisen to resting.
    pub rise_duration_secs: f32,
    /// Nominal host tick period.
    pub tick_interval_ms: u64,
    pub projection: Projection,
    pub assets: AssetPaths,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            tile_count: DEFAULT_TILE_COUNT,
            seed: None,
            max_attempts: None,
            rise_duration_secs: 2.0,
            tick_interval_ms: 33,
            projection: Projection::default(),
            assets: AssetPaths::default(),
        }
    }
}

impl SessionConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| SessionError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.rise_duration_secs.is_finite() && self.rise_duration_secs > 0.0) {
            return Err(SessionError::InvalidConfig(format!(
                "rise_duration_secs must be positive, got {}",
                self.rise_duration_secs
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "tick_interval_ms must be positive".into(),
            ));
        }
        let p = &self.projection;
        if !(p.fov_y_degrees > 0.0 && p.fov_y_degrees < 180.0) {
            return Err(SessionError::InvalidConfig(format!(
                "fov_y_degrees must be within (0, 180), got {}",
                p.fov_y_degrees
            )));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(SessionError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                p.near, p.far
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reveal length as a `Duration`. Values too large to represent saturate.
    pub fn rise_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.rise_duration_secs).unwrap_or(Duration::MAX)
    }

    /// Map generator for these settings.
    pub fn generator(&self) -> GridGenerator {
        let generator = GridGenerator::new(self.grid_size, self.tile_count);
        match self.max_attempts {
            Some(cap) => generator.with_max_attempts(cap),
            None => generator,
        }
    }
}
