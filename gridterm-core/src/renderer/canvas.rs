use super::Color;
use crate::geometry::Size;

/// CPU-side RGBA frame buffer
///
/// Rows are tightly packed, 4 bytes per pixel, top row first: exactly the
/// layout `queue.write_texture` expects for an `Rgba8*` texture.
pub struct Canvas {
    size: Size,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        let mut canvas = Self {
            size: Size::default(),
            pixels: Vec::new(),
        };
        canvas.resize(size);
        canvas
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate to `size`, clearing to transparent black
    pub fn resize(&mut self, size: Size) {
        if !size.is_positive() || size == self.size {
            return;
        }
        self.size = size;
        self.pixels = vec![0; size.width as usize * size.height as usize * 4];
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Fill a rectangle, clipped to the canvas
    ///
    /// Opaque colors overwrite; translucent ones are blended over what is there.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.size.width);
        let y1 = y.saturating_add(height).min(self.size.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let opaque = [color.r, color.g, color.b, 255];
        for py in y0..y1 {
            let start = self.offset(x0, py);
            let end = self.offset(x1, py);
            for pixel in self.pixels[start..end].chunks_exact_mut(4) {
                if color.a == 255 {
                    pixel.copy_from_slice(&opaque);
                } else {
                    let dst = [pixel[0], pixel[1], pixel[2], pixel[3]];
                    pixel.copy_from_slice(&color.blend_over(dst, 255));
                }
            }
        }
    }

    /// Blend an 8-bit coverage bitmap (e.g. a rasterized glyph) at (x, y)
    pub fn draw_coverage(
        &mut self,
        bitmap: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        color: Color,
    ) {
        for gy in 0..height {
            let py = y + gy as i32;
            if py < 0 || py >= self.size.height {
                continue;
            }
            for gx in 0..width {
                let px = x + gx as i32;
                if px < 0 || px >= self.size.width {
                    continue;
                }

                let coverage = bitmap[gy * width + gx];
                if coverage == 0 {
                    continue;
                }

                let i = self.offset(px, py);
                let dst = [
                    self.pixels[i],
                    self.pixels[i + 1],
                    self.pixels[i + 2],
                    self.pixels[i + 3],
                ];
                self.pixels[i..i + 4].copy_from_slice(&color.blend_over(dst, coverage));
            }
        }
    }
}
