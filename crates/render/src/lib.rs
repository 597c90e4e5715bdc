//! Rendering adapter: turns tiles into per-face draw submissions.
//!
//! # Invariants
//! - Rendering never mutates tiles or the camera.
//! - Every tile produces exactly six face draws, in a fixed order.
//! - Backends see only [`FaceDraw`]s; atlas addressing happens here.

mod error;
mod geometry;
mod pipeline;
mod renderer;

pub use error::{SetupError, ShaderStage};
pub use geometry::{FaceGeometry, FaceVertex, SIDE_COUNT};
pub use pipeline::{
    FaceDraw, FaceKind, FaceTexture, Projection, TileTransformPipeline, UvRect, atlas_uv_rect,
};
pub use renderer::{DrawRecorder, FaceRenderer, RecordedFrame};
