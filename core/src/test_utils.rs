//! Shared test utilities for pipeline unit tests

use anyhow::bail;

use nees_shared::{ControllerState, MAX_PLAYERS, VideoFrame};

use crate::engine::Engine;
use crate::present::PresentationSurface;

// ============================================================================
// Scripted Engine
// ============================================================================

/// Deterministic engine for driver and runtime tests.
///
/// Each tick stamps pixel (0, 0) with [`ScriptedEngine::marker`] and emits
/// `samples_per_tick` samples numbered consecutively from 0 (wrapping).
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    samples_per_tick: usize,
    next_sample: i16,
    tick: u64,
    fail_on: Option<u64>,
    scribble: bool,
    inputs: Vec<[ControllerState; MAX_PLAYERS]>,
}

impl ScriptedEngine {
    pub fn new(samples_per_tick: usize) -> Self {
        Self {
            samples_per_tick,
            ..Default::default()
        }
    }

    /// Fail the step whose zero-based index is `tick`.
    pub fn fail_on_tick(mut self, tick: u64) -> Self {
        self.fail_on = Some(tick);
        self
    }

    /// Write [`ScriptedEngine::SCRIBBLE`] to pixel (0, 0) before failing.
    pub fn scribble_on_fault(mut self) -> Self {
        self.scribble = true;
        self
    }

    /// Pixel left behind by a step that fails after drawing
    pub const SCRIBBLE: u32 = VideoFrame::rgba(0xFF, 0x00, 0xFF, 0xFF);

    /// Pixel value written after `ticks` completed steps
    pub fn marker(ticks: u64) -> u32 {
        VideoFrame::rgba(ticks as u8, (ticks >> 8) as u8, 0x5A, 0xFF)
    }

    /// Input seen by each completed step
    pub fn inputs(&self) -> &[[ControllerState; MAX_PLAYERS]] {
        &self.inputs
    }
}

impl Engine for ScriptedEngine {
    fn load(rom: &[u8]) -> anyhow::Result<Self> {
        if rom.is_empty() {
            bail!("empty ROM");
        }
        Ok(Self::new(usize::from(rom[0])))
    }

    fn step(
        &mut self,
        input: [ControllerState; MAX_PLAYERS],
        frame: &mut VideoFrame,
        emit: &mut dyn FnMut(i16),
    ) -> anyhow::Result<()> {
        if self.fail_on == Some(self.tick) {
            if self.scribble {
                frame.pixels_mut()[0] = Self::SCRIBBLE;
            }
            bail!("scripted fault at tick {}", self.tick);
        }

        self.inputs.push(input);
        self.tick += 1;
        frame.pixels_mut()[0] = Self::marker(self.tick);
        for _ in 0..self.samples_per_tick {
            emit(self.next_sample);
            self.next_sample = self.next_sample.wrapping_add(1);
        }
        Ok(())
    }
}

// ============================================================================
// Recording Surface
// ============================================================================

/// Surface that remembers pixel (0, 0) of every presented frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub presented: Vec<u32>,
    pub fail: bool,
}

impl PresentationSurface for RecordingSurface {
    fn present(&mut self, frame: &VideoFrame) -> anyhow::Result<()> {
        if self.fail {
            bail!("surface lost");
        }
        self.presented.push(frame.get(0, 0).unwrap_or_default());
        Ok(())
    }
}

// ============================================================================
// Input
// ============================================================================

/// No buttons held on either controller
pub fn idle_input() -> [ControllerState; MAX_PLAYERS] {
    [ControllerState::empty(); MAX_PLAYERS]
}
