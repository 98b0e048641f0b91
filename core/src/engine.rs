//! Contract with the external emulation engine and input sampling

use nees_shared::{ControllerState, MAX_PLAYERS, VideoFrame};

/// An emulation core advanced one fixed step at a time.
///
/// Implementations own all machine state. The pipeline only sees the
/// framebuffer they draw into and the samples they emit.
pub trait Engine {
    /// Boot the engine from a ROM image.
    fn load(rom: &[u8]) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Advance one tick.
    ///
    /// `frame` is mutated in place. `emit` is called synchronously, zero or
    /// more times, with each audio sample produced during the step.
    fn step(
        &mut self,
        input: [ControllerState; MAX_PLAYERS],
        frame: &mut VideoFrame,
        emit: &mut dyn FnMut(i16),
    ) -> anyhow::Result<()>;
}

/// Supplies button state for every player, sampled once per tick.
pub trait InputSource {
    fn poll(&mut self) -> [ControllerState; MAX_PLAYERS];
}

/// Fixed input, for headless runs and tests
impl InputSource for [ControllerState; MAX_PLAYERS] {
    fn poll(&mut self) -> [ControllerState; MAX_PLAYERS] {
        *self
    }
}
