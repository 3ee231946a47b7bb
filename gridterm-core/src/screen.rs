use crate::buffer::{check_batch, Grid};
use crate::error::ScreenResult;
use crate::font::FontMetrics;
use crate::geometry::{Dimension, Padding, Size};
use crate::glyph::Glyph;
use crate::layout::Layout;
use crate::renderer::{sweep, Color, DrawSurface};
use crate::resize::ResizeTarget;
use log::{debug, info};
use parking_lot::RwLock;
use std::time::Instant;

/// Immutable screen configuration, built once and handed to
/// [`TermScreen::initialize`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    /// Pixel footprint of one cell, usually `FontMetrics::cell_size()`
    pub cell_size: Size,
    /// Initial display size in pixels
    pub display_size: Size,
    /// Configured inset around the grid
    pub inner_padding: Padding,
    /// Cells whose background equals this color skip the background fill
    pub default_background: Color,
    /// Log per-operation timings at debug level
    pub track_performance: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            cell_size: Size::new(8, 16),
            display_size: Size::new(1280, 720),
            inner_padding: Padding::uniform(10),
            default_background: Color::BLACK,
            track_performance: false,
        }
    }
}

/// Everything protected by the screen lock: cell content and the geometry
/// it was laid out with
pub struct ScreenState {
    grid: Grid,
    layout: Layout,
}

impl ScreenState {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Apply a new display size and recompute; the grid is cleared on success
    fn resize(&mut self, size: Size) -> bool {
        self.layout.set_display_size(size) && self.layout.recompute(&mut self.grid)
    }
}

/// Thread-safe character screen
///
/// A single `parking_lot::RwLock` guards both the grid and the layout. Reads
/// (`get`, geometry queries, the render sweep) share the lock; every mutation,
/// including a resize and its layout recompute, holds it exclusively. A reader
/// therefore always sees a dimension together with the content laid out for it.
pub struct TermScreen {
    state: RwLock<ScreenState>,
    default_background: Color,
    track_performance: bool,
}

impl TermScreen {
    /// Lay out the grid for `config` and allocate it
    pub fn initialize(config: ScreenConfig) -> Self {
        let mut layout = Layout::new(config.cell_size, config.inner_padding);
        let mut grid = Grid::new(0, 0);
        layout.set_display_size(config.display_size);
        layout.recompute(&mut grid);

        let dimension = layout.dimension();
        info!(
            "Screen initialized: {}x{} cells ({}x{} px, cell {}x{})",
            dimension.cols,
            dimension.rows,
            config.display_size.width,
            config.display_size.height,
            config.cell_size.width,
            config.cell_size.height
        );

        Self {
            state: RwLock::new(ScreenState { grid, layout }),
            default_background: config.default_background,
            track_performance: config.track_performance,
        }
    }

    fn timed<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        if !self.track_performance {
            return f();
        }
        let start = Instant::now();
        let result = f();
        debug!(
            "{} took {:.4}ms",
            operation,
            start.elapsed().as_secs_f64() * 1000.0
        );
        result
    }

    //--------------------------------------------------------------------------
    // Geometry

    /// Resize to a new display size in pixels
    ///
    /// Display size and recompute happen in one write-lock hold. Returns
    /// `false` (geometry unchanged) for a non-positive size or cell size.
    pub fn resize(&self, size: Size) -> bool {
        self.timed("resize", || self.state.write().resize(size))
    }

    /// Replace the cell size (e.g. after a font change) and recompute
    pub fn set_cell_size(&self, size: Size) -> bool {
        self.timed("set_cell_size", || {
            let mut state = self.state.write();
            let ScreenState { grid, layout } = &mut *state;
            layout.set_cell_size(size);
            layout.recompute(grid)
        })
    }

    /// Replace the inner padding and recompute
    pub fn set_inner_padding(&self, padding: Padding) -> bool {
        let mut state = self.state.write();
        let ScreenState { grid, layout } = &mut *state;
        layout.set_inner_padding(padding);
        layout.recompute(grid)
    }

    pub fn dimension(&self) -> Dimension {
        self.state.read().layout.dimension()
    }

    pub fn cell_size(&self) -> Size {
        self.state.read().layout.cell_size()
    }

    pub fn display_size(&self) -> Size {
        self.state.read().layout.display_size()
    }

    /// Derived outer (centering) padding
    pub fn padding(&self) -> Padding {
        self.state.read().layout.outer_padding()
    }

    pub fn inner_padding(&self) -> Padding {
        self.state.read().layout.inner_padding()
    }

    /// Consistent copy of the current geometry
    pub fn layout(&self) -> Layout {
        self.state.read().layout.clone()
    }

    pub fn default_background(&self) -> Color {
        self.default_background
    }

    //--------------------------------------------------------------------------
    // Cells

    pub fn get(&self, row: i32, col: i32) -> Option<Glyph> {
        self.state.read().grid.get(row, col)
    }

    pub fn set(&self, row: i32, col: i32, glyph: impl Into<Option<Glyph>>) {
        self.state.write().grid.set(row, col, glyph);
    }

    pub fn fill(&self, glyph: impl Into<Option<Glyph>>) {
        let glyph = glyph.into();
        self.timed("fill", || self.state.write().grid.fill(glyph));
    }

    pub fn outline(&self, glyph: Glyph) {
        self.timed("outline", || self.state.write().grid.outline(glyph));
    }

    pub fn fill_rect(&self, r0: i32, c0: i32, r1: i32, c1: i32, glyph: Glyph) {
        self.timed("fill_rect", || {
            self.state.write().grid.fill_rect(r0, c0, r1, c1, glyph)
        });
    }

    pub fn draw_rect(&self, r0: i32, c0: i32, r1: i32, c1: i32, glyph: Glyph) {
        self.timed("draw_rect", || {
            self.state.write().grid.draw_rect(r0, c0, r1, c1, glyph)
        });
    }

    /// Write many cells under one lock acquisition
    ///
    /// Mismatched slice lengths are rejected before the lock is taken.
    pub fn set_batch(&self, positions: &[(i32, i32)], glyphs: &[Glyph]) -> ScreenResult<()> {
        check_batch(positions, glyphs)?;
        self.timed("set_batch", || {
            self.state.write().grid.set_batch(positions, glyphs)
        })
    }

    /// Write `text` from (row, col), truncated at the right edge
    pub fn write_text(&self, row: i32, col: i32, text: &str, fg: Color, bg: Color) -> usize {
        self.timed("write_text", || {
            self.state.write().grid.write_text(row, col, text, fg, bg)
        })
    }

    /// Run `f` with the read lock held
    pub fn with_read<T>(&self, f: impl FnOnce(&ScreenState) -> T) -> T {
        f(&self.state.read())
    }

    /// Run `f` with the write lock held, for compound read-then-write updates
    pub fn with_write<T>(&self, f: impl FnOnce(&mut ScreenState) -> T) -> T {
        f(&mut self.state.write())
    }

    //--------------------------------------------------------------------------
    // Rendering

    /// Sweep every occupied cell onto `surface` under one read-lock hold
    ///
    /// Returns the number of glyphs drawn.
    pub fn render(&self, surface: &mut dyn DrawSurface, metrics: &dyn FontMetrics) -> usize {
        self.timed("render", || {
            let state = self.state.read();
            sweep::render_sweep(&state, metrics, surface, self.default_background)
        })
    }

    /// Size `surface` to the display, clear it and run the sweep
    ///
    /// The display size and the grid come from the same read lock hold, so a
    /// resize cannot land between sizing the surface and drawing the cells.
    pub fn draw_frame(&self, surface: &mut dyn DrawSurface, metrics: &dyn FontMetrics) -> usize {
        self.timed("draw_frame", || {
            let state = self.state.read();
            let display = state.layout.display_size();
            if display.is_positive() && surface.size() != display {
                surface.resize(display);
            }

            let size = surface.size();
            surface.fill_rect(0, 0, size.width, size.height, self.default_background);
            sweep::render_sweep(&state, metrics, surface, self.default_background)
        })
    }
}

impl ResizeTarget for TermScreen {
    fn apply_resize(&self, size: Size) -> bool {
        let applied = self.resize(size);
        if applied {
            debug!("Resized to: {}x{}", size.width, size.height);
        }
        applied
    }
}
