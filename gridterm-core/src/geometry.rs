/// Pixel and cell value types shared by the layout engine and the renderer
///
/// - `Size`: a pixel footprint (the display area, or a single cell)
/// - `Dimension`: a grid shape in columns and rows
/// - `Padding`: a horizontal/vertical pixel inset
///
/// Pixel quantities are signed so that intermediate layout arithmetic (display
/// smaller than its padding, cells addressed one past the border) never wraps.

/// Pixel width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Both axes strictly positive
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Grid shape in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub cols: usize,
    pub rows: usize,
}

impl Dimension {
    #[inline]
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`rows * cols`)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check whether a signed (row, col) pair addresses a cell of this shape
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }
}

/// Horizontal and vertical pixel inset, applied symmetrically on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding {
    pub horizontal: i32,
    pub vertical: i32,
}

impl Padding {
    #[inline]
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Same inset on both axes
    #[inline]
    pub const fn uniform(padding: i32) -> Self {
        Self::new(padding, padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_positive() {
        assert!(Size::new(1, 1).is_positive());
        assert!(!Size::new(0, 10).is_positive());
        assert!(!Size::new(10, -1).is_positive());
    }

    #[test]
    fn test_dimension_contains() {
        let dim = Dimension::new(4, 3);
        assert!(dim.contains(0, 0));
        assert!(dim.contains(2, 3));
        assert!(!dim.contains(3, 0)); // row == rows
        assert!(!dim.contains(0, 4)); // col == cols
        assert!(!dim.contains(-1, 0));
        assert!(!dim.contains(0, -1));
        assert_eq!(dim.cell_count(), 12);
    }

    #[test]
    fn test_empty_dimension_contains_nothing() {
        let dim = Dimension::default();
        assert!(!dim.contains(0, 0));
        assert_eq!(dim.cell_count(), 0);
    }

    #[test]
    fn test_uniform_padding() {
        assert_eq!(Padding::uniform(10), Padding::new(10, 10));
    }
}
