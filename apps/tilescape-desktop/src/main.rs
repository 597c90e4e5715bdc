mod keymap;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tilescape_input::KeyInput;
use tilescape_render_wgpu::{RenderResources, WgpuRenderer};
use tilescape_session::{LoopState, Session, SessionConfig, SessionError, TracingLogger};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tilescape-desktop", about = "Tile map viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON session config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map seed, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Asset directory, overriding the config
    #[arg(long)]
    assets: Option<PathBuf>,
}

/// Window and device state, created on the first `resumed`.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tilescape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }
}

struct TileApp {
    session: Session,
    gpu: Option<Gpu>,
    renderer: Option<WgpuRenderer>,
    shift: bool,
    period: Duration,
    next_tick: Instant,
    last_tick: Instant,
    fatal: Option<anyhow::Error>,
}

impl TileApp {
    fn new(session: Session) -> Self {
        let period = session.config().tick_interval();
        let now = Instant::now();
        Self {
            session,
            gpu: None,
            renderer: None,
            shift: false,
            period,
            next_tick: now,
            last_tick: now,
            fatal: None,
        }
    }

    /// Load assets and build GPU resources, gating the session on the result.
    fn setup(&mut self, gpu: &Gpu) {
        let paths = self.session.config().assets.clone();
        let format = gpu.config.format;
        let setup = async {
            let assets = tilescape_assets::load(&paths).await?;
            let resources =
                RenderResources::new(&gpu.device, &gpu.queue, format, &assets).await?;
            Ok::<_, SessionError>(resources)
        };
        match pollster::block_on(self.session.start_with(setup)) {
            Ok(resources) => {
                self.renderer = Some(WgpuRenderer::new(
                    &gpu.device,
                    resources,
                    gpu.config.width,
                    gpu.config.height,
                ));
            }
            Err(err) => tracing::error!("setup failed, not rendering: {err}"),
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let now = Instant::now();
        let elapsed = now - self.last_tick;
        self.last_tick = now;

        self.session.tick(elapsed, gpu.aspect(), renderer);
        renderer.present(&gpu.device, &gpu.queue, &view);
        output.present();
    }
}

impl ApplicationHandler for TileApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Tilescape")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let gpu = event_loop
            .create_window(attrs)
            .map_err(|e| anyhow::anyhow!("create window: {e}"))
            .and_then(|window| Gpu::new(Arc::new(window)));
        let gpu = match gpu {
            Ok(gpu) => gpu,
            Err(err) => {
                tracing::error!("{err:#}");
                self.fatal = Some(err);
                event_loop.exit();
                return;
            }
        };

        self.setup(&gpu);
        self.gpu = Some(gpu);

        if self.session.state() == LoopState::Running {
            let now = Instant::now();
            self.last_tick = now;
            self.next_tick = now + self.period;
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, gpu.config.width, gpu.config.height);
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.session.handle_key(&KeyInput {
                    key: keymap::logical_key(code),
                    pressed: state == ElementState::Pressed,
                    shift: self.shift,
                    repeat,
                });
            }
            WindowEvent::RedrawRequested => {
                // Frames are driven by the tick deadline, not by redraw requests.
                if let Some(gpu) = &self.gpu {
                    gpu.window.pre_present_notify();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.state() != LoopState::Running {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        if Instant::now() >= self.next_tick {
            self.frame(event_loop);
            // Fixed cadence from the previous deadline; overruns are not caught up.
            self.next_tick += self.period;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(root) = &cli.assets {
        config.assets.root = root.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tilescape-desktop starting");

    let config = load_config(&cli)?;
    let session = Session::new(config, TracingLogger)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = TileApp::new(session);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
