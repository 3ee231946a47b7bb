//! Recording surface and fixed font metrics shared by unit tests

use crate::font::FontMetrics;
use crate::geometry::Size;
use crate::renderer::{Color, DrawSurface};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCall {
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    Char {
        ch: char,
        x: f32,
        baseline_y: f32,
        color: Color,
    },
}

pub(crate) struct RecordingSurface {
    pub size: Size,
    pub calls: Vec<DrawCall>,
    pub presents: usize,
    pub resizes: Vec<Size>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            calls: Vec::new(),
            presents: 0,
            resizes: Vec::new(),
        }
    }

    pub fn chars(&self) -> Vec<(char, f32, f32, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                DrawCall::Char {
                    ch,
                    x,
                    baseline_y,
                    color,
                } => Some((ch, x, baseline_y, color)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(i32, i32, i32, i32, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                DrawCall::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => Some((x, y, width, height, color)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        if size.is_positive() {
            self.size = size;
            self.resizes.push(size);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_char(&mut self, ch: char, x: f32, baseline_y: f32, color: Color) {
        self.calls.push(DrawCall::Char {
            ch,
            x,
            baseline_y,
            color,
        });
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.presents += 1;
        Ok(())
    }
}

/// Monospace metrics with every advance equal to `advance`
pub(crate) struct FixedMetrics {
    pub cell: Size,
    pub ascent: f32,
    pub descent: f32,
    pub advance: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            cell: Size::new(10, 20),
            ascent: 14.0,
            descent: 4.0,
            advance: 6.0,
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn cell_size(&self) -> Size {
        self.cell
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn advance(&self, _ch: char) -> f32 {
        self.advance
    }
}
