//! Pipeline configuration
//!
//! Every field has a default so partial TOML tables deserialize cleanly.
//! Values are clamped by their accessors rather than rejected on load.

use serde::{Deserialize, Serialize};

use nees_shared::{DEFAULT_POOL_SLOTS, NES_SAMPLE_RATE};

pub use crate::runtime::RuntimeConfig;

/// Configuration for the whole presentation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Fixed-timestep settings
    #[serde(default)]
    pub timing: RuntimeConfig,
    /// Audio bridge settings
    #[serde(default)]
    pub audio: AudioConfig,
}

/// Audio bridge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate the host stream is opened at (default: 15720)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Slots in the buffer pool (default: 4, minimum 1)
    #[serde(default = "default_pool_slots")]
    pub pool_slots: usize,
    /// Output gain (default: 1.0, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_sample_rate() -> u32 {
    NES_SAMPLE_RATE
}
fn default_pool_slots() -> usize {
    DEFAULT_POOL_SLOTS
}
fn default_volume() -> f32 {
    1.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            pool_slots: default_pool_slots(),
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    pub fn pool_slots(&self) -> usize {
        self.pool_slots.max(1)
    }

    /// Volume clamped to `0.0..=1.0`; NaN is treated as silence.
    pub fn volume(&self) -> f32 {
        if self.volume.is_nan() {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }
}
