use crate::foundation::core::Viewport;
use crate::foundation::error::SceneResult;
use crate::render::display_list::DisplayList;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are premultiplied alpha by default. The `premultiplied` flag makes this explicit at
/// API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

/// Rasterizer contract: turn a recorded [`DisplayList`] into pixels for `viewport`.
///
/// The list is in layout pixels; backends scale by the viewport's device pixel ratio.
pub trait RenderBackend {
    /// Rasterize one frame.
    fn render(&mut self, list: &DisplayList, viewport: &Viewport) -> SceneResult<FrameRGBA>;

    /// Drop cached resources tied to a surface size (called after resize).
    fn release_surface(&mut self) {}
}
