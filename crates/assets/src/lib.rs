//! Tile asset loading: the front-face atlas, back and side textures, and the
//! two WGSL shader sources.
//!
//! All five assets load together; any single failure fails the whole load and
//! nothing partial is returned.

use std::path::{Path, PathBuf};

use futures::try_join;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

/// Where the tile assets live. Relative file names resolve against `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub root: PathBuf,
    /// 5x5 front-face texture atlas.
    pub atlas: PathBuf,
    pub back: PathBuf,
    pub side: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            atlas: PathBuf::from("tiles.png"),
            back: PathBuf::from("tilebg.png"),
            side: PathBuf::from("noise.png"),
            vertex_shader: PathBuf::from("tile.vert.wgsl"),
            fragment_shader: PathBuf::from("tile.frag.wgsl"),
        }
    }
}

impl AssetPaths {
    /// Default file names under a different root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Full path for one of the file fields.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.root.join(file)
    }
}

/// Decoded tile textures plus shader sources, ready for a render backend.
#[derive(Debug, Clone)]
pub struct TileAssets {
    pub atlas: RgbaImage,
    pub back_tex: RgbaImage,
    pub side_tex: RgbaImage,
    pub vertex_shader_src: String,
    pub frag_shader_src: String,
}

/// Errors from asset loading. Each carries the offending path.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AssetLoadError {
    pub fn path(&self) -> &Path {
        match self {
            AssetLoadError::Io { path, .. } | AssetLoadError::Decode { path, .. } => path,
        }
    }
}

/// Load and decode every tile asset.
pub async fn load(paths: &AssetPaths) -> Result<TileAssets, AssetLoadError> {
    let joined = async {
        try_join!(
            load_image(paths.resolve(&paths.atlas)),
            load_image(paths.resolve(&paths.back)),
            load_image(paths.resolve(&paths.side)),
            load_string(paths.resolve(&paths.vertex_shader)),
            load_string(paths.resolve(&paths.fragment_shader)),
        )
    };
    let (atlas, back_tex, side_tex, vertex_shader_src, frag_shader_src) = joined
        .instrument(tracing::info_span!("load_assets", root = %paths.root.display()))
        .await?;

    tracing::debug!(
        atlas = ?atlas.dimensions(),
        back = ?back_tex.dimensions(),
        side = ?side_tex.dimensions(),
        "tile assets decoded"
    );
    Ok(TileAssets {
        atlas,
        back_tex,
        side_tex,
        vertex_shader_src,
        frag_shader_src,
    })
}

async fn load_binary(path: &Path) -> Result<Vec<u8>, AssetLoadError> {
    std::fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode an image to RGBA8.
pub async fn load_image(path: PathBuf) -> Result<RgbaImage, AssetLoadError> {
    let bytes = load_binary(&path).await?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetLoadError::Decode {
        path: path.clone(),
        source,
    })?;
    tracing::trace!(path = %path.display(), "image loaded");
    Ok(image.to_rgba8())
}

/// Read a UTF-8 text file.
pub async fn load_string(path: PathBuf) -> Result<String, AssetLoadError> {
    let text = std::fs::read_to_string(&path).map_err(|source| AssetLoadError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::trace!(path = %path.display(), bytes = text.len(), "text loaded");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_fixture(dir: &Path) {
        RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]))
            .save(dir.join("tiles.png"))
            .unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]))
            .save(dir.join("tilebg.png"))
            .unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(dir.join("noise.png"))
            .unwrap();
        std::fs::write(dir.join("tile.vert.wgsl"), "// vertex").unwrap();
        std::fs::write(dir.join("tile.frag.wgsl"), "// fragment").unwrap();
    }

    #[test]
    fn default_paths() {
        let paths = AssetPaths::default();
        assert_eq!(paths.resolve(&paths.atlas), Path::new("assets/tiles.png"));
        assert_eq!(paths.resolve(&paths.side), Path::new("assets/noise.png"));
    }

    #[test]
    fn paths_deserialize_with_defaults() {
        let paths: AssetPaths = serde_json::from_str(r#"{"root": "/data"}"#).unwrap();
        assert_eq!(paths, AssetPaths::with_root("/data"));
    }

    #[test]
    fn loads_all_five_assets() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let assets = pollster::block_on(load(&AssetPaths::with_root(dir.path()))).unwrap();
        assert_eq!(assets.atlas.dimensions(), (10, 10));
        assert_eq!(assets.back_tex.dimensions(), (4, 4));
        assert_eq!(assets.side_tex.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(assets.vertex_shader_src, "// vertex");
        assert_eq!(assets.frag_shader_src, "// fragment");
    }

    #[test]
    fn missing_file_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::remove_file(dir.path().join("tile.frag.wgsl")).unwrap();

        let err = pollster::block_on(load(&AssetPaths::with_root(dir.path()))).unwrap_err();
        assert!(matches!(err, AssetLoadError::Io { .. }));
        assert!(err.path().ends_with("tile.frag.wgsl"));
    }

    #[test]
    fn undecodable_image_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::write(dir.path().join("tilebg.png"), b"not a png").unwrap();

        let err = pollster::block_on(load(&AssetPaths::with_root(dir.path()))).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode { .. }));
        assert!(err.path().ends_with("tilebg.png"));
        assert!(err.to_string().contains("tilebg.png"));
    }
}
