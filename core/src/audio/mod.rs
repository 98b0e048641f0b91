//! Audio handoff from the control loop to the real-time renderer
//!
//! - [`pool`]: fixed slot pool with FIFO free and ready queues
//! - [`bridge`]: batching producer and real-time consumer
//! - [`metrics`]: overrun/underrun counters and periodic logging

pub mod bridge;
pub mod metrics;
pub mod pool;

#[cfg(test)]
mod tests;

pub use bridge::{RenderConsumer, SampleProducer, channel};
pub use metrics::{AudioMetrics, BridgeStats, StatsSnapshot};
pub use pool::{BufferPool, PoolError, SampleBatch, SlotIndex, SlotState};
