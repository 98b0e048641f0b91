//! nees player - desktop host for the presentation pipeline
//!
//! Supplies the platform side of `nees-core`: a winit window whose redraws
//! drive the control loop, a wgpu surface that presents frames, a cpal
//! stream that runs the audio render callback, and keyboard/gamepad input.

pub mod app;
pub mod audio_output;
pub mod config;
pub mod graphics;
pub mod input;
pub mod pattern;

pub use app::{PlayerApp, run};
pub use config::Config;
