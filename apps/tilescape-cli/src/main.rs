use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilescape_common::Tile;
use tilescape_render::DrawRecorder;
use tilescape_session::{MemoryLogger, Session, SessionConfig, SessionError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilescape-cli", about = "CLI tool for tilescape maps")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON session config; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Map seed, overriding the config
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective config
    Info,
    /// Generate a map and print it
    Generate {
        /// Number of tiles, overriding the config
        #[arg(short = 'n', long)]
        tiles: Option<usize>,
        /// Print tiles as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// Run ticks headless and report what would be drawn
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "61")]
        ticks: u32,
        /// Viewport aspect ratio
        #[arg(long, default_value = "1.7777778")]
        aspect: f32,
        /// Dump every draw of the final frame
        #[arg(long)]
        describe: bool,
    },
}

/// Grid of variant ids, highest row first so +Y points up. Empty cells are dots.
fn render_ascii(tiles: &[Tile], grid_size: u32) -> String {
    let mut out = String::new();
    for y in (0..grid_size).rev() {
        let row: Vec<String> = (0..grid_size)
            .map(|x| {
                tiles
                    .iter()
                    .find(|t| t.x == x && t.y == y)
                    .map(|t| format!("{:>2}", t.variant.index()))
                    .unwrap_or_else(|| " .".to_string())
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

fn load_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("tilescape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Generate { tiles, json } => {
            if let Some(count) = tiles {
                config.tile_count = count;
            }
            let grid_size = config.grid_size;
            let session = Session::new(config, MemoryLogger::new())?;
            if json {
                println!("{}", serde_json::to_string_pretty(session.tiles())?);
            } else {
                if let Some(seed) = session.seed() {
                    println!("seed {seed}, {} tiles", session.tiles().len());
                }
                print!("{}", render_ascii(session.tiles(), grid_size));
            }
        }
        Commands::Simulate {
            ticks,
            aspect,
            describe,
        } => {
            let interval = config.tick_interval();
            let mut session = Session::new(config, MemoryLogger::new())?;
            session.start(Ok::<(), SessionError>(()))?;

            tracing::debug!(ticks, ?interval, "simulating");
            let mut recorder = DrawRecorder::new();
            for _ in 0..ticks {
                recorder.clear();
                session.tick(interval, aspect, &mut recorder);
            }

            for line in session.logger().lines() {
                println!("log: {line}");
            }
            let risen = session.tiles().iter().filter(|t| t.is_risen()).count();
            let elapsed = interval * ticks;
            println!(
                "{ticks} ticks ({:.3}s): {}/{} tiles risen",
                elapsed.as_secs_f32(),
                risen,
                session.tiles().len()
            );
            if let Some(frame) = recorder.last_frame() {
                println!("last frame: {} face draws", frame.draws.len());
            }
            if describe {
                print!("{}", recorder.describe());
            }
        }
    }

    Ok(())
}
