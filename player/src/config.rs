//! Configuration management (config.toml in the platform config directory)
//!
//! Missing or unreadable files fall back to defaults so a broken config
//! never stops the player from starting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use nees_core::{PipelineConfig, ScaleMode};

use crate::input::InputConfig;

const CONFIG_FILE: &str = "config.toml";

/// Player configuration.
///
/// Pipeline settings (`[timing]`, `[audio]`) sit at the top level next to
/// the player's own sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    /// Window and presentation settings
    #[serde(default)]
    pub video: VideoConfig,
    /// Keyboard and gamepad settings
    #[serde(default)]
    pub input: InputConfig,
}

/// Video configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Whether to run in fullscreen mode (default: false)
    #[serde(default)]
    pub fullscreen: bool,
    /// Whether to enable vertical sync (default: true)
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Initial window size as a multiple of 256x240 (default: 3)
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Scaling mode for the frame inside the window (default: PixelPerfect)
    #[serde(default)]
    pub scale_mode: ScaleMode,
}

fn default_true() -> bool {
    true
}
fn default_scale() -> u32 {
    3
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: default_true(),
            scale: default_scale(),
            scale_mode: ScaleMode::default(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\nees\config`
/// On macOS: `~/Library/Application Support/io.nees.nees`
/// On Linux: `~/.config/nees`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nees", "", "nees").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the platform config directory.
pub fn load() -> Config {
    config_path().map(|path| load_from(&path)).unwrap_or_default()
}

/// Loads the configuration from `path`.
///
/// Returns defaults if the file doesn't exist; logs and returns defaults if
/// it cannot be parsed.
pub fn load_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Saves the configuration to the platform config directory.
pub fn save(config: &Config) -> Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.pipeline.timing.tick_rate, 60);
        assert_eq!(config.pipeline.audio.pool_slots, 4);
        assert!(config.video.vsync);
        assert!(!config.video.fullscreen);
        assert_eq!(config.video.scale, 3);
        assert_eq!(config.video.scale_mode, ScaleMode::PixelPerfect);
        assert!(config.input.keyboards.p1.is_some());
        assert!(config.input.keyboards.p2.is_some());
        assert_eq!(config.input.stick_deadzone, 0.5);
    }

    // =============================================================
    // TOML tests
    // =============================================================

    #[test]
    fn test_partial_toml() {
        let toml_str = r#"
            [audio]
            volume = 0.5

            [video]
            scale_mode = "Fit"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pipeline.audio.volume, 0.5);
        assert_eq!(config.pipeline.audio.sample_rate, 15_720);
        assert_eq!(config.video.scale_mode, ScaleMode::Fit);
        assert!(config.video.vsync);
    }

    #[test]
    fn test_keyboard_override() {
        let toml_str = r#"
            [input.keyboards.p1]
            a = "Z"
            b = "X"
            select = "ShiftRight"
            start = "Enter"
            up = "ArrowUp"
            down = "ArrowDown"
            left = "ArrowLeft"
            right = "ArrowRight"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let p1 = config.input.keyboards.get(0).unwrap();
        assert_eq!(p1.a, winit::keyboard::KeyCode::KeyZ);
        assert!(config.input.keyboards.p2.is_some());
    }

    // =============================================================
    // File tests
    // =============================================================

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.video.fullscreen = true;
        config.pipeline.timing.max_delta_ms = 250;
        config.input.keyboards.p2 = Some(crate::input::KeyboardMapping::player_one());

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "video = 12").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }
}
