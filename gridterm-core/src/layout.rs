/// Pixel-to-cell layout engine
///
/// Derives the grid shape and its centering inset from three inputs:
/// - the pixel footprint of one cell (from font metrics)
/// - the pixel size of the display area
/// - the configured inner padding
///
/// ```text
/// cols  = floor((display.width  - 2 * inner.horizontal) / cell.width)
/// rows  = floor((display.height - 2 * inner.vertical)   / cell.height)
/// outer = (display - cells * cell - 2 * inner) / 2        (per axis)
/// ```
///
/// The layout never locks anything itself; `TermScreen` keeps it next to the
/// grid under one write lock so a recompute and the matching grid resize are
/// observed together.
use crate::buffer::Grid;
use crate::geometry::{Dimension, Padding, Size};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    cell_size: Size,
    display_size: Size,
    inner_padding: Padding,
    outer_padding: Padding,
    dimension: Dimension,
}

impl Layout {
    pub fn new(cell_size: Size, inner_padding: Padding) -> Self {
        Self {
            cell_size,
            display_size: Size::default(),
            inner_padding: non_negative(inner_padding),
            outer_padding: Padding::default(),
            dimension: Dimension::default(),
        }
    }

    /// Store the pixel footprint of one character cell
    pub fn set_cell_size(&mut self, size: Size) {
        debug!("Cell size: {}x{}", size.width, size.height);
        self.cell_size = size;
    }

    /// Store the display area size; non-positive sizes are ignored
    ///
    /// Windows report zero sizes while being created or minimized, so this is
    /// logged and skipped rather than treated as an error.
    pub fn set_display_size(&mut self, size: Size) -> bool {
        if !size.is_positive() {
            debug!("Ignoring invalid display size: {}x{}", size.width, size.height);
            return false;
        }
        self.display_size = size;
        true
    }

    /// Negative components are clamped to 0
    pub fn set_inner_padding(&mut self, padding: Padding) {
        self.inner_padding = non_negative(padding);
    }

    /// Recompute dimension and outer padding, resizing `grid` to match
    ///
    /// Returns `false` without touching anything when the cell size is not
    /// positive. The grid is reallocated even if its shape is unchanged.
    pub fn recompute(&mut self, grid: &mut Grid) -> bool {
        let cell = self.cell_size;
        if cell.width <= 0 || cell.height <= 0 {
            warn!(
                "Cannot calculate screen dimensions: invalid cell size {}x{}",
                cell.width, cell.height
            );
            return false;
        }

        let inner = self.inner_padding;
        let usable_width = self
            .display_size
            .width
            .saturating_sub(inner.horizontal.saturating_mul(2));
        let usable_height = self
            .display_size
            .height
            .saturating_sub(inner.vertical.saturating_mul(2));
        let cols = usable_width.div_euclid(cell.width);
        let rows = usable_height.div_euclid(cell.height);

        grid.resize(rows, cols);
        self.dimension = grid.dimension();

        let used_width = self.dimension.cols as i32 * cell.width;
        let used_height = self.dimension.rows as i32 * cell.height;
        self.outer_padding = Padding::new(
            usable_width.saturating_sub(used_width).div_euclid(2),
            usable_height.saturating_sub(used_height).div_euclid(2),
        );

        debug!(
            "Layout: {}x{} cells in {}x{} px, outer padding {}x{}",
            self.dimension.cols,
            self.dimension.rows,
            self.display_size.width,
            self.display_size.height,
            self.outer_padding.horizontal,
            self.outer_padding.vertical
        );
        true
    }

    /// Top-left pixel of the cell at (row, col)
    #[inline]
    pub fn cell_origin(&self, row: usize, col: usize) -> (i32, i32) {
        let (origin_x, origin_y) = self.grid_origin();
        let x = origin_x.saturating_add((col as i32).saturating_mul(self.cell_size.width));
        let y = origin_y.saturating_add((row as i32).saturating_mul(self.cell_size.height));
        (x, y)
    }

    /// Cell (row, col) containing the pixel (x, y)
    ///
    /// The result may lie outside the grid; `None` only when the cell size is
    /// not positive.
    pub fn pixel_to_cell(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let cell = self.cell_size;
        if cell.width <= 0 || cell.height <= 0 {
            return None;
        }
        let (origin_x, origin_y) = self.grid_origin();
        Some((
            y.saturating_sub(origin_y).div_euclid(cell.height),
            x.saturating_sub(origin_x).div_euclid(cell.width),
        ))
    }

    fn grid_origin(&self) -> (i32, i32) {
        (
            self.outer_padding
                .horizontal
                .saturating_add(self.inner_padding.horizontal),
            self.outer_padding
                .vertical
                .saturating_add(self.inner_padding.vertical),
        )
    }

    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    pub fn display_size(&self) -> Size {
        self.display_size
    }

    pub fn inner_padding(&self) -> Padding {
        self.inner_padding
    }

    pub fn outer_padding(&self) -> Padding {
        self.outer_padding
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

fn non_negative(padding: Padding) -> Padding {
    if padding.horizontal < 0 || padding.vertical < 0 {
        warn!(
            "Negative inner padding {}x{} clamped to 0",
            padding.horizontal, padding.vertical
        );
    }
    Padding::new(padding.horizontal.max(0), padding.vertical.max(0))
}
