//! winit application driving the control loop
//!
//! Every `RedrawRequested` runs one control-loop callback and immediately
//! requests the next redraw, so with vsync enabled the loop is paced by the
//! display.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use nees_core::{EmulationDriver, Engine, Runtime, channel};
use nees_shared::nes_specs;

use crate::audio_output::AudioOutput;
use crate::config::Config;
use crate::graphics::FrameSurface;
use crate::input::InputManager;

const TITLE: &str = "nees";

/// Host application owning the window, surface, audio stream and runtime
pub struct PlayerApp<E> {
    config: Config,
    runtime: Runtime<E>,
    input: InputManager,
    window: Option<Arc<Window>>,
    surface: Option<FrameSurface>,
    /// Kept alive so the stream keeps playing
    _audio: Option<AudioOutput>,
}

impl<E: Engine> PlayerApp<E> {
    /// Boot `rom` and open the audio device. The window is created once the
    /// event loop resumes.
    pub fn new(config: Config, rom: &[u8]) -> Result<Self> {
        let (producer, consumer) = channel(&config.pipeline.audio);
        let driver = EmulationDriver::<E>::boot(rom, producer)?;
        let runtime = Runtime::new(driver, &config.pipeline.timing);

        let audio = match AudioOutput::new(consumer, &config.pipeline.audio) {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Audio disabled: {}", e);
                None
            }
        };

        Ok(Self {
            input: InputManager::new(config.input.clone()),
            config,
            runtime,
            window: None,
            surface: None,
            _audio: audio,
        })
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = if self.runtime.is_halted() {
            format!("{TITLE} (halted)")
        } else if self.runtime.is_paused() {
            format!("{TITLE} (paused)")
        } else {
            TITLE.to_string()
        };
        window.set_title(&title);
    }

    fn toggle_fullscreen(&mut self) {
        if let Some(window) = &self.window {
            let fullscreen = window.fullscreen().is_none();
            window.set_fullscreen(fullscreen.then(|| Fullscreen::Borderless(None)));
            self.config.video.fullscreen = fullscreen;
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if pressed && !event.repeat {
            match code {
                KeyCode::Escape => {
                    let paused = !self.runtime.is_paused();
                    self.runtime.set_paused(paused);
                    self.update_title();
                }
                KeyCode::F11 => self.toggle_fullscreen(),
                _ => {}
            }
        }
        self.input.update_keyboard(code, pressed);
    }

    fn render_frame(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match self.runtime.frame(Instant::now(), &mut self.input, surface) {
            Ok(report) => {
                if let Some(fault) = report.fault {
                    error!("Engine stopped: {:#}", anyhow::Error::from(fault));
                    self.update_title();
                }
            }
            Err(e) => error!("Render error: {:#}", anyhow::Error::from(e)),
        }
    }
}

impl<E: Engine> ApplicationHandler for PlayerApp<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let specs = nes_specs();
        let scale = self.config.video.scale.max(1);
        let mut window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(
                specs.frame_width * scale,
                specs.frame_height * scale,
            ));
        if self.config.video.fullscreen {
            window_attributes = window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match FrameSurface::new(
            window.clone(),
            self.config.video.vsync,
            self.config.video.scale_mode,
        ) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                error!("Failed to initialize graphics: {:#}", e);
                event_loop.exit();
                return;
            }
        }

        info!(
            "{}: {}x{} at {} Hz, audio {} Hz",
            specs.name, specs.frame_width, specs.frame_height, specs.tick_rate, specs.sample_rate
        );
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = &mut self.surface {
                    surface.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.input.clear_keyboard(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::RedrawRequested => {
                self.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Run the player until the window closes.
pub fn run<E: Engine>(config: Config, rom: &[u8]) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = PlayerApp::<E>::new(config, rom)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
