use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use sheen_engine::device::GpuInit;
use sheen_engine::logging::{init_logging, LoggingConfig};
use sheen_engine::surface::{Preset, SurfaceConfig};
use sheen_engine::window::{Runtime, RuntimeConfig};

mod snapshot;

#[derive(Parser)]
#[command(name = "sheen-studio", version)]
#[command(about = "Touch-reactive procedural background")]
struct Cli {
    /// JSON surface configuration (camelCase keys, unknown keys ignored)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset used when no config file is given
    #[arg(long, default_value = "liquid")]
    preset: String,

    /// Number of windows, each with an independent background
    #[arg(long, default_value_t = 1)]
    windows: usize,

    /// Window title
    #[arg(long, default_value = "sheen")]
    title: String,

    /// Window / snapshot width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Window / snapshot height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Render headlessly into this PNG instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate before taking the snapshot
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let Some(preset) = Preset::from_name(&cli.preset) else {
        let known: Vec<&str> = Preset::all().iter().map(|p| p.name()).collect();
        bail!("unknown preset {:?} (known: {})", cli.preset, known.join(", "));
    };

    let surface = match &cli.config {
        Some(path) => load_config(path)?,
        None => preset.config(),
    };

    if let Some(out) = &cli.snapshot {
        return snapshot::render_to_png(&surface, cli.width, cli.height, cli.frames, out);
    }

    let config = RuntimeConfig {
        title: cli.title,
        initial_size: winit_size(cli.width, cli.height),
        windows: cli.windows,
        surface,
        preset,
        ..RuntimeConfig::default()
    };

    log::info!("opening {} window(s), preset {}", config.windows.max(1), preset.name());
    Runtime::run(config, GpuInit::default())
}

fn load_config(path: &Path) -> Result<SurfaceConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = SurfaceConfig::from_json(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    log::info!("loaded surface config from {}", path.display());
    Ok(config)
}

fn winit_size(width: u32, height: u32) -> sheen_engine::window::LogicalSize<f64> {
    sheen_engine::window::LogicalSize::new(width.max(1) as f64, height.max(1) as f64)
}
