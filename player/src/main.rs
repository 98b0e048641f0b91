//! nees - standalone player
//!
//! # Usage
//!
//! ```bash
//! nees path/to/game.nes
//! nees game.nes --fullscreen --scale-mode fit
//! ```
//!
//! # Keyboard Shortcuts
//!
//! - ESC: Pause/Resume
//! - F11: Toggle fullscreen

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use nees_core::ScaleMode;
use nees_player::config;
use nees_player::pattern::PatternEngine;

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Stretch,
    Fit,
    PixelPerfect,
}

impl From<ScaleArg> for ScaleMode {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Stretch => ScaleMode::Stretch,
            ScaleArg::Fit => ScaleMode::Fit,
            ScaleArg::PixelPerfect => ScaleMode::PixelPerfect,
        }
    }
}

#[derive(Parser)]
#[command(name = "nees")]
#[command(author, version, about = "nees - NES frontend with a fixed-timestep presentation pipeline")]
struct Args {
    /// ROM file to play
    rom: PathBuf,

    /// Config file (default: config.toml in the platform config directory)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start in fullscreen mode
    #[arg(long, short = 'f')]
    fullscreen: bool,

    /// Initial window scale (multiple of 256x240)
    #[arg(long, short = 's')]
    scale: Option<u32>,

    /// How the frame is fitted to the window
    #[arg(long, value_enum)]
    scale_mode: Option<ScaleArg>,

    /// Output volume (0.0-1.0)
    #[arg(long)]
    volume: Option<f32>,

    /// Write the effective config back to disk before starting
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.rom.exists() {
        anyhow::bail!("ROM file not found: {}", args.rom.display());
    }
    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("Failed to read ROM {}", args.rom.display()))?;

    let mut config = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    if args.fullscreen {
        config.video.fullscreen = true;
    }
    if let Some(scale) = args.scale {
        config.video.scale = scale;
    }
    if let Some(mode) = args.scale_mode {
        config.video.scale_mode = mode.into();
    }
    if let Some(volume) = args.volume {
        config.pipeline.audio.volume = volume;
    }

    if args.save_config {
        match &args.config {
            Some(path) => config::save_to(&config, path)?,
            None => config::save(&config)?,
        }
    }

    info!("Loaded {} ({} bytes)", args.rom.display(), rom.len());
    nees_player::run::<PatternEngine>(config, &rom)
}
