//! nees core - real-time presentation pipeline
//!
//! Connects an emulation engine, advanced in fixed 60 Hz steps from an
//! irregular display callback, to a hardware-paced audio renderer and a
//! video surface.
//!
//! # Architecture
//!
//! - [`Runtime`] - Control loop, called once per display callback
//! - [`FixedTimestep`] - Converts callback timestamps into tick counts
//! - [`EmulationDriver`] - Runs the [`Engine`] and batches its samples
//! - [`audio`] - Buffer pool and lock-free handoff to the audio callback
//! - [`PresentationSurface`] - Receives the final frame of each callback

pub mod audio;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod present;
pub mod runtime;
#[cfg(test)]
pub mod test_utils;

pub use audio::{BridgeStats, BufferPool, RenderConsumer, SampleProducer, StatsSnapshot, channel};
pub use config::{AudioConfig, PipelineConfig};
pub use driver::EmulationDriver;
pub use engine::{Engine, InputSource};
pub use error::PipelineError;
pub use present::{PresentationSurface, ScaleMode, Viewport, viewport};
pub use runtime::{FixedTimestep, FrameReport, Runtime, RuntimeConfig};

pub use nees_shared::{ControllerState, MAX_PLAYERS, VideoFrame};
