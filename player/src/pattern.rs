//! Built-in test pattern engine
//!
//! Stands in for a real emulator so the pipeline can run end to end. Draws
//! scrolling colour bars and plays a square wave while buttons are held,
//! emitting one sample per scanline like the real hardware's audio rate.

use nees_core::{ControllerState, Engine, MAX_PLAYERS, VideoFrame};
use nees_shared::{NES_FRAME_HEIGHT, NES_FRAME_WIDTH, NES_SAMPLE_RATE, NES_TICK_RATE};

/// Scanlines per tick, one sample each
pub const SAMPLES_PER_TICK: usize = (NES_SAMPLE_RATE / NES_TICK_RATE) as usize;

const BAR_COUNT: u32 = 8;
const AMPLITUDE: i16 = 6000;

/// Tone for each button bit, in Hz
const TONES: [u32; 8] = [262, 294, 330, 349, 392, 440, 494, 523];

pub struct PatternEngine {
    palette: [u32; BAR_COUNT as usize],
    scroll: u32,
    phase: u32,
}

impl PatternEngine {
    fn tone(input: &[ControllerState; MAX_PLAYERS]) -> Option<u32> {
        let held = input.iter().fold(0u8, |mask, state| mask | state.bits());
        (0..8)
            .find(|&bit| held & (1 << bit) != 0)
            .map(|bit| TONES[bit])
    }

    fn draw(&self, frame: &mut VideoFrame, tint: u8) {
        let bar_width = NES_FRAME_WIDTH / BAR_COUNT;
        let width = NES_FRAME_WIDTH as usize;
        for (i, pixel) in frame.pixels_mut().iter_mut().enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            let bar = ((x + self.scroll) / bar_width) % BAR_COUNT;
            let mut color = self.palette[bar as usize];
            // Darken the lower half so scrolling is visible on flat palettes
            if y >= NES_FRAME_HEIGHT / 2 {
                color = ((color >> 1) & 0xFF7F_7F7F) | 0xFF00_0000;
            }
            *pixel = color ^ u32::from(tint);
        }
    }
}

impl Engine for PatternEngine {
    fn load(rom: &[u8]) -> anyhow::Result<Self> {
        // FNV-1a over the ROM picks the palette
        let mut hash: u32 = 0x811C_9DC5;
        for &byte in rom {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }

        let mut palette = [0; BAR_COUNT as usize];
        for (i, color) in palette.iter_mut().enumerate() {
            let seed = hash.rotate_left(i as u32 * 4);
            let [r, g, b, _] = seed.to_le_bytes();
            *color = VideoFrame::rgba(r | 0x40, g | 0x40, b | 0x40, 0xFF);
        }

        Ok(Self {
            palette,
            scroll: 0,
            phase: 0,
        })
    }

    fn step(
        &mut self,
        input: [ControllerState; MAX_PLAYERS],
        frame: &mut VideoFrame,
        emit: &mut dyn FnMut(i16),
    ) -> anyhow::Result<()> {
        self.scroll = (self.scroll + 1) % NES_FRAME_WIDTH;
        let tint = input[0].bits() | input[1].bits();
        self.draw(frame, tint);

        match Self::tone(&input) {
            Some(freq) => {
                // Phase in units of 1/NES_SAMPLE_RATE cycles
                for _ in 0..SAMPLES_PER_TICK {
                    self.phase = (self.phase + freq) % NES_SAMPLE_RATE;
                    emit(if self.phase < NES_SAMPLE_RATE / 2 {
                        AMPLITUDE
                    } else {
                        -AMPLITUDE
                    });
                }
            }
            None => {
                self.phase = 0;
                for _ in 0..SAMPLES_PER_TICK {
                    emit(0);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> [ControllerState; MAX_PLAYERS] {
        [ControllerState::empty(); MAX_PLAYERS]
    }

    fn step(engine: &mut PatternEngine, input: [ControllerState; MAX_PLAYERS]) -> Vec<i16> {
        let mut frame = VideoFrame::new();
        let mut samples = Vec::new();
        engine
            .step(input, &mut frame, &mut |s| samples.push(s))
            .unwrap();
        samples
    }

    #[test]
    fn test_emits_one_sample_per_scanline() {
        assert_eq!(SAMPLES_PER_TICK, 262);
        let mut engine = PatternEngine::load(b"rom").unwrap();
        assert_eq!(step(&mut engine, idle()).len(), 262);
    }

    #[test]
    fn test_silent_without_input() {
        let mut engine = PatternEngine::load(&[]).unwrap();
        assert!(step(&mut engine, idle()).iter().all(|&s| s == 0));
    }

    #[test]
    fn test_held_button_plays_square_wave() {
        let mut engine = PatternEngine::load(&[]).unwrap();
        let samples = step(&mut engine, [ControllerState::A, ControllerState::empty()]);
        assert!(samples.iter().all(|&s| s == AMPLITUDE || s == -AMPLITUDE));
        assert!(samples.contains(&AMPLITUDE));
        assert!(samples.contains(&-AMPLITUDE));
    }

    #[test]
    fn test_rom_seeds_palette() {
        let a = PatternEngine::load(b"one").unwrap();
        let b = PatternEngine::load(b"two").unwrap();
        assert_ne!(a.palette, b.palette);
    }

    #[test]
    fn test_frame_is_opaque_and_scrolls() {
        let mut engine = PatternEngine::load(b"rom").unwrap();
        let mut first = VideoFrame::new();
        let mut second = VideoFrame::new();
        engine.step(idle(), &mut first, &mut |_| {}).unwrap();
        engine.step(idle(), &mut second, &mut |_| {}).unwrap();

        assert!(first.pixels().iter().all(|&p| p >> 24 == 0xFF));
        assert_ne!(first.pixels(), second.pixels());
    }
}
