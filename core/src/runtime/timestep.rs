//! Fixed-timestep scheduling
//!
//! Converts irregular callback timestamps into a whole number of ticks. The
//! remainder is carried exactly: the accumulator counts nanoseconds scaled
//! by the tick rate, so one tick is always `NANOS_PER_SEC` units and no
//! rounding error builds up however the deltas are split.

use std::time::{Duration, Instant};

use tracing::debug;

use super::RuntimeConfig;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Accumulator turning wall-clock deltas into tick counts.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick_rate: u128,
    max_delta: Duration,
    /// Carried time in nanoseconds × tick rate; always `< NANOS_PER_SEC`
    /// after `advance` returns.
    accumulator: u128,
    last_update: Option<Instant>,
}

impl FixedTimestep {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            tick_rate: u128::from(config.tick_rate()),
            max_delta: config.max_delta(),
            accumulator: 0,
            last_update: None,
        }
    }

    /// Ticks due at `now`.
    ///
    /// The first call has no previous timestamp and yields exactly one tick.
    pub fn advance(&mut self, now: Instant) -> u32 {
        match self.last_update.replace(now) {
            Some(last) => self.advance_by(now.saturating_duration_since(last)),
            None => {
                self.accumulator += NANOS_PER_SEC;
                self.drain()
            }
        }
    }

    /// Ticks due after `delta` more wall-clock time, clamped to the
    /// configured maximum.
    pub fn advance_by(&mut self, delta: Duration) -> u32 {
        let delta = if delta > self.max_delta {
            debug!("Frame delta {:?} clamped to {:?}", delta, self.max_delta);
            self.max_delta
        } else {
            delta
        };

        self.accumulator += delta.as_nanos() * self.tick_rate;
        self.drain()
    }

    /// Forget carried time and restart measuring from `now`.
    pub fn resync(&mut self, now: Instant) {
        self.accumulator = 0;
        self.last_update = Some(now);
    }

    /// Carried remainder, truncated to whole nanoseconds.
    pub fn accumulated(&self) -> Duration {
        let nanos = self.accumulator / self.tick_rate;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulator as f64 / self.tick_rate as f64 / 1_000_000.0
    }

    /// Nominal tick length, rounded to the nearest nanosecond.
    pub fn tick_duration(&self) -> Duration {
        let nanos = (NANOS_PER_SEC + self.tick_rate / 2) / self.tick_rate;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn tick_rate(&self) -> u32 {
        u32::try_from(self.tick_rate).unwrap_or(u32::MAX)
    }

    fn drain(&mut self) -> u32 {
        let ticks = self.accumulator / NANOS_PER_SEC;
        self.accumulator %= NANOS_PER_SEC;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}
