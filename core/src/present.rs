//! Presentation surface contract and viewport scaling
//!
//! A surface receives the driver's frame once per host callback, after all
//! ticks for that callback have run. It uploads the whole frame and draws it;
//! there are no partial updates.

use serde::{Deserialize, Serialize};

use nees_shared::VideoFrame;

/// Destination for completed video frames.
pub trait PresentationSurface {
    /// Upload `frame` in full and draw it once.
    fn present(&mut self, frame: &VideoFrame) -> anyhow::Result<()>;
}

/// Scaling mode for the frame inside the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    /// Stretch to fill window (may distort aspect ratio)
    Stretch,
    /// Maintain aspect ratio, scale to fill as much as possible (adds letterbox bars)
    Fit,
    /// Integer scaling for pixel-perfect rendering (adds black bars, may not fill screen)
    #[default]
    PixelPerfect,
}

/// Target rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Place a `frame`-sized image inside a `window`-sized target.
///
/// Sizes are `(width, height)`. The result always lies within the window;
/// pixel-perfect scaling falls back to `Fit` when the window is smaller
/// than one frame.
pub fn viewport(mode: ScaleMode, frame: (u32, u32), window: (u32, u32)) -> Viewport {
    let render_width = frame.0.max(1) as f32;
    let render_height = frame.1.max(1) as f32;
    let window_width = window.0 as f32;
    let window_height = window.1 as f32;

    let scale = match mode {
        ScaleMode::Stretch => {
            return Viewport {
                x: 0.0,
                y: 0.0,
                width: window_width,
                height: window_height,
            };
        }
        ScaleMode::Fit => (window_width / render_width).min(window_height / render_height),
        ScaleMode::PixelPerfect => {
            let integer = (window_width / render_width)
                .floor()
                .min((window_height / render_height).floor());
            if integer >= 1.0 {
                integer
            } else {
                (window_width / render_width).min(window_height / render_height)
            }
        }
    };

    let width = render_width * scale;
    let height = render_height * scale;
    Viewport {
        x: (window_width - width) / 2.0,
        y: (window_height - height) / 2.0,
        width,
        height,
    }
}
