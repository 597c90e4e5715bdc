use std::future::Future;
use std::time::Duration;

use glam::Mat4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilescape_common::Tile;
use tilescape_input::{CameraController, KeyInput};
use tilescape_render::{FaceRenderer, TileTransformPipeline};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::logger::{Logger, TracingLogger};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Map generated, waiting for setup to resolve.
    Uninitialized,
    /// Setup succeeded; ticks advance and draw.
    Running,
    /// Setup failed. Terminal.
    Halted,
}

/// One run of the tile map: generated tiles, the camera, and setup gating.
///
/// The host owns the clock and the window. It calls [`start`](Self::start)
/// once with the outcome of loading assets and building GPU resources, then
/// [`tick`](Self::tick) at its own cadence.
#[derive(Debug)]
pub struct Session<L: Logger = TracingLogger> {
    config: SessionConfig,
    seed: Option<u64>,
    tiles: Vec<Tile>,
    camera: CameraController,
    pipeline: TileTransformPipeline,
    logger: L,
    state: LoopState,
    /// Time spent `Running`, summed exactly across ticks.
    reveal_elapsed: Duration,
}

impl<L: Logger> Session<L> {
    /// Generate a map from `config.seed`, or from OS entropy when unset.
    pub fn new(config: SessionConfig, logger: L) -> Result<Self, SessionError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "map seed");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Self::with_rng(config, &mut rng, logger)?;
        session.seed = Some(seed);
        Ok(session)
    }

    /// Generate a map from a caller-supplied rng. [`seed`](Self::seed) is
    /// `None` for sessions built this way.
    pub fn with_rng<R: Rng + ?Sized>(
        config: SessionConfig,
        rng: &mut R,
        logger: L,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let tiles = config.generator().generate(rng)?;
        tracing::info!(
            tiles = tiles.len(),
            grid_size = config.grid_size,
            "session created"
        );
        Ok(Self {
            config,
            seed: None,
            tiles,
            camera: CameraController::default(),
            pipeline: TileTransformPipeline::new(),
            logger,
            state: LoopState::Uninitialized,
            reveal_elapsed: Duration::ZERO,
        })
    }

    /// Leave `Uninitialized` with the outcome of setup.
    ///
    /// Success moves to `Running` and hands the setup value back. Failure is
    /// logged and moves to `Halted` for good.
    pub fn start<T, E>(&mut self, setup: Result<T, E>) -> Result<T, SessionError>
    where
        E: Into<SessionError>,
    {
        if self.state != LoopState::Uninitialized {
            return Err(SessionError::AlreadyStarted);
        }
        match setup {
            Ok(value) => {
                self.logger.line("tile assets loaded");
                self.transition(LoopState::Running);
                Ok(value)
            }
            Err(err) => {
                let err = err.into();
                self.logger.error(&format!("tile asset loading failed: {err}"));
                self.transition(LoopState::Halted);
                Err(err)
            }
        }
    }

    /// Await `setup` and pass its outcome to [`start`](Self::start). The
    /// future is not polled when the session has already started.
    pub async fn start_with<F, T, E>(&mut self, setup: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<SessionError>,
    {
        if self.state != LoopState::Uninitialized {
            return Err(SessionError::AlreadyStarted);
        }
        let outcome = setup.await;
        self.start(outcome)
    }

    /// Forward a key event to the camera. Accepted in every state.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        self.camera.handle_key(input)
    }

    /// Advance by `elapsed` and draw one frame. Returns `false` without
    /// touching anything unless the session is `Running`.
    pub fn tick<R: FaceRenderer + ?Sized>(
        &mut self,
        elapsed: Duration,
        aspect: f32,
        renderer: &mut R,
    ) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.camera.advance(elapsed.as_secs_f32());
        self.reveal_elapsed = self.reveal_elapsed.saturating_add(elapsed);
        let duration = self.config.rise_duration();
        for tile in &mut self.tiles {
            tile.reveal(self.reveal_elapsed, duration);
        }
        let projection = self.config.projection.matrix(aspect);
        self.pipeline
            .draw(&self.tiles, &self.camera.camera(), &projection, renderer);
        true
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn camera(&self) -> Mat4 {
        self.camera.camera()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Seed the map was generated from, when the session chose it.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    fn transition(&mut self, next: LoopState) {
        tracing::info!(from = ?self.state, to = ?next, "session state changed");
        self.state = next;
    }
}
