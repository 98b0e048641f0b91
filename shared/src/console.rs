//! Console specifications for the NES-class engine driven by the pipeline.

/// Specifications for an emulated console.
///
/// Describes the fixed geometry and clock rates the presentation pipeline
/// is sized against. The audio renderer is expected to run at
/// `sample_rate` so no resampling is needed.
#[derive(Debug, Clone)]
pub struct ConsoleSpecs {
    /// Console name (e.g., "NES-001")
    pub name: &'static str,
    /// Framebuffer width in pixels
    pub frame_width: u32,
    /// Framebuffer height in pixels
    pub frame_height: u32,
    /// Emulation ticks per second
    pub tick_rate: u32,
    /// Native audio output rate in Hz
    pub sample_rate: u32,
    /// Samples per audio render quantum
    pub render_quantum: usize,
    /// Default number of slots in the audio buffer pool
    pub pool_slots: usize,
}

// === NES-001 Specifications ===

/// Visible framebuffer width
pub const NES_FRAME_WIDTH: u32 = 256;

/// Visible framebuffer height
pub const NES_FRAME_HEIGHT: u32 = 240;

/// Frames per second the engine is stepped at
pub const NES_TICK_RATE: u32 = 60;

/// One sample per scanline: 262 scanlines × 60 frames
pub const NES_SAMPLE_RATE: u32 = 15_720;

/// Samples handed to the audio renderer per callback
pub const RENDER_QUANTUM: usize = 128;

/// Default audio buffer pool size
pub const DEFAULT_POOL_SLOTS: usize = 4;

static NES_SPECS: ConsoleSpecs = ConsoleSpecs {
    name: "NES-001",
    frame_width: NES_FRAME_WIDTH,
    frame_height: NES_FRAME_HEIGHT,
    tick_rate: NES_TICK_RATE,
    sample_rate: NES_SAMPLE_RATE,
    render_quantum: RENDER_QUANTUM,
    pool_slots: DEFAULT_POOL_SLOTS,
};

/// Get NES-001 console specifications.
pub fn nes_specs() -> &'static ConsoleSpecs {
    &NES_SPECS
}
