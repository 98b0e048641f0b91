//! Control loop
//!
//! Invoked once per host display callback. Each call asks the fixed-timestep
//! scheduler how many ticks are due, runs them through the emulation driver,
//! then presents the driver's frame exactly once, even when no tick ran.

use std::time::Instant;

use tracing::{error, info};

use crate::audio::AudioMetrics;
use crate::driver::EmulationDriver;
use crate::engine::{Engine, InputSource};
use crate::error::PipelineError;
use crate::present::PresentationSurface;

mod config;
mod timestep;


pub use config::RuntimeConfig;
pub use timestep::FixedTimestep;

/// Outcome of one control-loop callback
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Ticks the scheduler asked for
    pub scheduled: u32,
    /// Ticks that completed
    pub executed: u32,
    /// Engine failure that halted the runtime during this callback.
    ///
    /// Reported once; later callbacks present the last frame and return
    /// `None` here.
    pub fault: Option<PipelineError>,
}

/// Main runtime composing scheduler, driver and presentation
pub struct Runtime<E> {
    driver: EmulationDriver<E>,
    timestep: FixedTimestep,
    metrics: AudioMetrics,
    paused: bool,
    halted: bool,
}

impl<E: Engine> Runtime<E> {
    pub fn new(mut driver: EmulationDriver<E>, config: &RuntimeConfig) -> Self {
        driver.set_cpu_budget(Some(config.cpu_budget()));
        Self {
            driver,
            timestep: FixedTimestep::new(config),
            metrics: AudioMetrics::new(Instant::now()),
            paused: false,
            halted: false,
        }
    }

    /// Run one host callback at time `now`.
    ///
    /// Engine faults halt tick advancement and are reported in the returned
    /// [`FrameReport`]. Only a presentation failure is returned as `Err`.
    pub fn frame(
        &mut self,
        now: Instant,
        input: &mut dyn InputSource,
        surface: &mut dyn PresentationSurface,
    ) -> Result<FrameReport, PipelineError> {
        let mut report = FrameReport::default();

        if self.paused || self.halted {
            self.timestep.resync(now);
        } else {
            report.scheduled = self.timestep.advance(now);
            let before = self.driver.ticks_executed();
            if let Err(err) = self.driver.run_ticks(report.scheduled, input) {
                let cause = std::error::Error::source(&err)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                error!("Emulation halted, {}: {}", err, cause);
                self.halted = true;
                report.fault = Some(err);
            }
            report.executed = (self.driver.ticks_executed() - before) as u32;
        }

        surface
            .present(self.driver.frame())
            .map_err(PipelineError::Present)?;

        self.metrics.maybe_log(self.driver.audio().stats(), now);
        Ok(report)
    }

    /// Stop or resume tick advancement. Presentation continues while paused
    /// and no catch-up burst follows a resume.
    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether an engine fault has stopped tick advancement for good
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn ticks_executed(&self) -> u64 {
        self.driver.ticks_executed()
    }

    pub fn tick_rate(&self) -> u32 {
        self.timestep.tick_rate()
    }

    pub fn driver(&self) -> &EmulationDriver<E> {
        &self.driver
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }
}
