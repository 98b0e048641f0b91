//! Emulation driver
//!
//! Runs the engine for the number of ticks the scheduler asks for. Input is
//! sampled once per tick, samples go straight into the audio producer, and
//! the engine mutates a working framebuffer in place. Each completed tick is
//! copied into the presented frame, so a failing step never reaches the
//! screen. Only the state after the last tick of a callback is presented.

use std::time::{Duration, Instant};

use nees_shared::VideoFrame;
use tracing::warn;

use crate::audio::{SampleProducer, StatsSnapshot};
use crate::engine::{Engine, InputSource};
use crate::error::PipelineError;

/// Owns the engine, its framebuffer and the producer half of the audio bridge.
pub struct EmulationDriver<E> {
    engine: E,
    frame: VideoFrame,
    last_good: VideoFrame,
    audio: SampleProducer,
    ticks_executed: u64,
    cpu_budget: Option<Duration>,
}

impl<E: Engine> EmulationDriver<E> {
    pub fn new(engine: E, audio: SampleProducer) -> Self {
        Self {
            engine,
            frame: VideoFrame::new(),
            last_good: VideoFrame::new(),
            audio,
            ticks_executed: 0,
            cpu_budget: None,
        }
    }

    /// Load `rom` into a fresh engine.
    pub fn boot(rom: &[u8], audio: SampleProducer) -> Result<Self, PipelineError> {
        let engine = E::load(rom).map_err(PipelineError::EngineInit)?;
        Ok(Self::new(engine, audio))
    }

    /// Warn when a single tick takes longer than `budget`.
    pub fn set_cpu_budget(&mut self, budget: Option<Duration>) {
        self.cpu_budget = budget;
    }

    /// Execute `count` ticks.
    ///
    /// Stops at the first engine failure. Ticks completed before the fault
    /// stay counted and their samples stay queued. Whatever the failing step
    /// wrote to the framebuffer is never presented.
    pub fn run_ticks(
        &mut self,
        count: u32,
        input: &mut dyn InputSource,
    ) -> Result<(), PipelineError> {
        for _ in 0..count {
            let tick_start = Instant::now();
            let buttons = input.poll();

            let audio = &mut self.audio;
            self.engine
                .step(buttons, &mut self.frame, &mut |sample| {
                    audio.push_sample(sample)
                })
                .map_err(|source| PipelineError::EngineFault {
                    tick: self.ticks_executed,
                    source,
                })?;
            self.ticks_executed += 1;
            self.last_good
                .pixels_mut()
                .copy_from_slice(self.frame.pixels());

            if let Some(budget) = self.cpu_budget {
                let tick_time = tick_start.elapsed();
                if tick_time > budget {
                    warn!("Tick took {:?}, exceeds budget of {:?}", tick_time, budget);
                }
            }
        }
        Ok(())
    }

    /// Framebuffer as left by the most recent completed tick
    pub fn frame(&self) -> &VideoFrame {
        &self.last_good
    }

    pub fn ticks_executed(&self) -> u64 {
        self.ticks_executed
    }

    pub fn audio_stats(&self) -> StatsSnapshot {
        self.audio.stats().snapshot()
    }

    pub fn audio(&self) -> &SampleProducer {
        &self.audio
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
