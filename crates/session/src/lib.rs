//! Session layer: owns the tile map, camera and setup state, and advances
//! them once per host tick.
//!
//! # Invariants
//! - The map is generated before any asset loads or rendering.
//! - Nothing is drawn until setup succeeds; a failed setup is terminal.
//! - Each tick runs camera advance, rise decay, then draw, in that order.

mod config;
mod error;
mod logger;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use session::{LoopState, Session};
