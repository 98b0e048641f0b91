//! Pipeline error types

use thiserror::Error;

/// Failures surfaced to the host by the control loop.
///
/// Audio overruns and underruns are not errors; they are counted in
/// [`BridgeStats`](crate::audio::BridgeStats).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("engine failed to initialize")]
    EngineInit(#[source] anyhow::Error),
    #[error("engine fault on tick {tick}")]
    EngineFault {
        tick: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to present frame")]
    Present(#[source] anyhow::Error),
}
