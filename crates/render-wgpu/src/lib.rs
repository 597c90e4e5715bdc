//! wgpu render backend for tile faces.
//!
//! Each face is one triangle-strip quad drawn with its own model-view matrix
//! and atlas rectangle, supplied through a dynamic-offset uniform buffer.
//!
//! # Invariants
//! - GPU resources are created once from [`TileAssets`](tilescape_assets::TileAssets);
//!   nothing is reloaded per frame.
//! - Shader and pipeline failures surface as [`SetupError`](tilescape_render::SetupError),
//!   never as panics.
//! - Draws queued through `FaceRenderer` reach the GPU only on [`WgpuRenderer::present`].

mod gpu;
mod shaders;
mod texture;

pub use gpu::{RenderResources, WgpuRenderer};
pub use texture::TileTexture;
