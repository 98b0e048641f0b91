//! Audio bridge health counters and periodic diagnostics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// How often [`AudioMetrics::maybe_log`] emits a line
const LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Counters shared by both halves of the audio bridge.
///
/// Updated with relaxed atomics so the render callback never takes a lock.
#[derive(Debug, Default)]
pub struct BridgeStats {
    overruns: AtomicU64,
    underruns: AtomicU64,
    batches_sent: AtomicU64,
    batches_played: AtomicU64,
}

impl BridgeStats {
    /// Batches dropped because the channel or the pool was full
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    /// Render calls that ran out of ready samples
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    pub fn batches_played(&self) -> u64 {
        self.batches_played.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            overruns: self.overruns(),
            underruns: self.underruns(),
            batches_sent: self.batches_sent(),
            batches_played: self.batches_played(),
        }
    }

    pub(crate) fn record_overrun(&self) {
        self.overruns.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_underrun(&self) {
        self.underruns.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sent(&self) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_played(&self) {
        self.batches_played.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`BridgeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub overruns: u64,
    pub underruns: u64,
    pub batches_sent: u64,
    pub batches_played: u64,
}

impl StatsSnapshot {
    /// Counter growth since `earlier`.
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            overruns: self.overruns.saturating_sub(earlier.overruns),
            underruns: self.underruns.saturating_sub(earlier.underruns),
            batches_sent: self.batches_sent.saturating_sub(earlier.batches_sent),
            batches_played: self.batches_played.saturating_sub(earlier.batches_played),
        }
    }

    /// No batch was dropped and no callback ran dry.
    pub fn is_glitch_free(&self) -> bool {
        self.overruns == 0 && self.underruns == 0
    }
}

/// Per-interval audio health reporting, driven from the control context.
#[derive(Debug, Clone)]
pub struct AudioMetrics {
    last: StatsSnapshot,
    last_log_time: Instant,
}

impl AudioMetrics {
    pub fn new(now: Instant) -> Self {
        Self {
            last: StatsSnapshot::default(),
            last_log_time: now,
        }
    }

    /// Log counter growth if a second has passed since the previous line.
    ///
    /// Returns the logged interval so callers can react to it.
    pub fn maybe_log(&mut self, stats: &BridgeStats, now: Instant) -> Option<StatsSnapshot> {
        if now.saturating_duration_since(self.last_log_time) < LOG_INTERVAL {
            return None;
        }

        let current = stats.snapshot();
        let interval = current.since(&self.last);
        if interval.is_glitch_free() {
            debug!(
                "AUDIO METRICS: sent={}, played={}, overruns={}, underruns={}",
                interval.batches_sent,
                interval.batches_played,
                interval.overruns,
                interval.underruns
            );
        } else {
            warn!(
                "AUDIO METRICS: sent={}, played={}, overruns={}, underruns={}",
                interval.batches_sent,
                interval.batches_played,
                interval.overruns,
                interval.underruns
            );
        }

        self.last = current;
        self.last_log_time = now;
        Some(interval)
    }
}
