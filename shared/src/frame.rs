//! Video framebuffer written by the engine and read by the presentation surface.

use crate::console::{NES_FRAME_HEIGHT, NES_FRAME_WIDTH};

/// Pixels per frame
pub const FRAME_PIXELS: usize = (NES_FRAME_WIDTH * NES_FRAME_HEIGHT) as usize;

/// Bytes per frame (RGBA8)
pub const FRAME_BYTES: usize = FRAME_PIXELS * 4;

/// A single 256×240 RGBA framebuffer.
///
/// Each `u32` holds one pixel whose little-endian bytes are R, G, B, A, so
/// the raw byte view can be uploaded directly as an `Rgba8Unorm` texture.
/// Allocated once and mutated in place every tick.
pub struct VideoFrame {
    pixels: Box<[u32]>,
}

impl VideoFrame {
    /// Allocate an opaque black frame.
    pub fn new() -> Self {
        Self {
            pixels: vec![Self::rgba(0, 0, 0, 0xFF); FRAME_PIXELS].into_boxed_slice(),
        }
    }

    /// Pack one pixel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        u32::from_le_bytes([r, g, b, a])
    }

    pub fn width(&self) -> u32 {
        NES_FRAME_WIDTH
    }

    pub fn height(&self) -> u32 {
        NES_FRAME_HEIGHT
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Raw RGBA8 bytes, row-major, `width * 4` bytes per row.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at (x, y), or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= NES_FRAME_WIDTH || y >= NES_FRAME_HEIGHT {
            return None;
        }
        self.pixels.get((y * NES_FRAME_WIDTH + x) as usize).copied()
    }
}

impl Default for VideoFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrame")
            .field("width", &NES_FRAME_WIDTH)
            .field("height", &NES_FRAME_HEIGHT)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size() {
        let frame = VideoFrame::new();
        assert_eq!(frame.pixels().len(), 256 * 240);
        assert_eq!(frame.as_bytes().len(), 256 * 240 * 4);
    }

    #[test]
    fn test_byte_order_is_rgba() {
        let mut frame = VideoFrame::new();
        frame.pixels_mut()[0] = VideoFrame::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(&frame.as_bytes()[..4], &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_get_bounds() {
        let frame = VideoFrame::new();
        assert!(frame.get(255, 239).is_some());
        assert!(frame.get(256, 0).is_none());
        assert!(frame.get(0, 240).is_none());
    }
}
