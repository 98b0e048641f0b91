//! Shared types for the nees presentation pipeline.
//!
//! Engine implementations and the pipeline both depend on this crate, so it
//! holds only the vocabulary they exchange: console specifications,
//! controller state and the video framebuffer.

pub mod console;
pub mod frame;
pub mod input;

pub use console::{
    ConsoleSpecs, DEFAULT_POOL_SLOTS, NES_FRAME_HEIGHT, NES_FRAME_WIDTH, NES_SAMPLE_RATE,
    NES_TICK_RATE, RENDER_QUANTUM, nes_specs,
};
pub use frame::{FRAME_BYTES, FRAME_PIXELS, VideoFrame};
pub use input::{ControllerState, MAX_PLAYERS};
