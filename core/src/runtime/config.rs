//! Runtime configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use nees_shared::NES_TICK_RATE;

/// Fixed-timestep configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Target tick rate in Hz (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Maximum delta clamp in milliseconds (prevents spiral of death)
    #[serde(default = "default_max_delta_ms")]
    pub max_delta_ms: u64,
    /// CPU budget warning threshold per tick, in microseconds
    #[serde(default = "default_cpu_budget_us")]
    pub cpu_budget_us: u64,
}

fn default_tick_rate() -> u32 {
    NES_TICK_RATE
}
fn default_max_delta_ms() -> u64 {
    500
}
fn default_cpu_budget_us() -> u64 {
    4000 // 4ms at 60fps
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            max_delta_ms: default_max_delta_ms(),
            cpu_budget_us: default_cpu_budget_us(),
        }
    }
}

impl RuntimeConfig {
    /// Tick rate, never zero
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate.max(1)
    }

    pub fn max_delta(&self) -> Duration {
        Duration::from_millis(self.max_delta_ms)
    }

    pub fn cpu_budget(&self) -> Duration {
        Duration::from_micros(self.cpu_budget_us)
    }
}
