use std::path::PathBuf;

use thiserror::Error;
use tilescape_assets::AssetLoadError;
use tilescape_mapgen::ConfigurationError;
use tilescape_render::SetupError;

/// Everything that can stop a session from starting.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("map configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("asset load error: {0}")]
    AssetLoad(#[from] AssetLoadError),
    #[error("render setup error: {0}")]
    Setup(#[from] SetupError),
    #[error("session already started")]
    AlreadyStarted,
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
