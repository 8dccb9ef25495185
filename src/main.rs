use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starfield::config::ShowConfig;
use starfield::constants::{FRAME_TIME, RENDER_HEIGHT, RENDER_WIDTH};
use starfield::{DrawList, Input, Presentation, Screen};

#[derive(Parser, Debug)]
#[command(name = "starfield", version, about = "Starfield intro, proposal and photo celebration")]
struct Cli {
    /// Configuration file (defaults to ./starfield.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name substituted for {name} in the final lines
    #[arg(long)]
    name: Option<String>,

    /// Seed every random source for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Render into memory instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Headless: frames to render
    #[arg(long, default_value_t = 3000)]
    frames: u64,

    /// Headless: press continue and accept as soon as possible
    #[arg(long)]
    walkthrough: bool,

    /// Headless: surface width in pixels
    #[arg(long, default_value_t = RENDER_WIDTH as f32)]
    width: f32,

    /// Headless: surface height in pixels
    #[arg(long, default_value_t = RENDER_HEIGHT as f32)]
    height: f32,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ShowConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(name) = &cli.name {
        config.partner_name = name.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate().context("invalid configuration")?;

    if cli.headless {
        run_headless(config, &cli)
    } else {
        run_window(config)
    }
}

fn run_headless(config: ShowConfig, cli: &Cli) -> Result<()> {
    let mut surface = DrawList::new(cli.width, cli.height);
    let mut presentation = Presentation::new(config, &mut surface)?;
    let start = Instant::now();
    let mut revealed = false;
    let mut shown = presentation.screen();

    for frame in 0..cli.frames {
        let now = start + frame_offset(frame);
        let status = presentation.frame(&mut surface, now)?;

        if status.continue_visible && !revealed {
            info!(frame = status.starfield_frame, "continue control revealed");
            revealed = true;
        }
        if status.screen != shown {
            info!(frame, screen = ?status.screen, "now showing");
            shown = status.screen;
        }

        if cli.walkthrough {
            match status.screen {
                Screen::Starfield if status.continue_visible => {
                    presentation.handle_input(Input::Confirm, &mut surface, now)
                }
                Screen::Proposal => presentation.handle_input(Input::Accept, &mut surface, now),
                _ => {}
            }
        }
        surface.take_commands();
    }

    info!(frames = cli.frames, screen = ?presentation.screen(), "headless run finished");
    Ok(())
}

/// Simulated time since the first headless frame.
fn frame_offset(frame: u64) -> Duration {
    let nanos = FRAME_TIME.as_nanos() * u128::from(frame);
    Duration::new((nanos / 1_000_000_000) as u64, (nanos % 1_000_000_000) as u32)
}

#[cfg(feature = "window")]
fn run_window(config: ShowConfig) -> Result<()> {
    starfield::window::run(config)
}

#[cfg(not(feature = "window"))]
fn run_window(_config: ShowConfig) -> Result<()> {
    anyhow::bail!("built without the `window` feature; run with --headless")
}
