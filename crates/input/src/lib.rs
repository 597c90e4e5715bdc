//! Camera input: logical key events mapped to camera actions, integrated
//! over time by the [`CameraController`].
//!
//! # Invariants
//! - Only the controller writes the camera matrix.
//! - Auto-repeat key events never change intent.

pub mod action;
mod camera;

pub use action::{Axis, CameraAction, KeyInput, LogicalKey, Sign};
pub use camera::{CameraController, FAST_MULTIPLIER, default_camera};
