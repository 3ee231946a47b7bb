/// Character grid storage and its mutation primitives
///
/// `Grid` is the unlocked storage: a row-major `Vec<Option<Glyph>>` indexed by
/// `row * cols + col`. Thread safety lives one level up, in
/// [`TermScreen`](crate::screen::TermScreen), which wraps the grid and the
/// layout in a single reader/writer lock and calls into these methods while
/// holding it.
///
/// Coordinates are signed. Anything outside `[0, rows) x [0, cols)` reads as
/// empty and writes as a no-op, so callers can address border neighbours
/// (`row - 1`, `col + 1`) without checking bounds first.
use crate::error::{ScreenError, ScreenResult};
use crate::geometry::Dimension;
use crate::glyph::Glyph;
use crate::renderer::Color;
use log::debug;

pub struct Grid {
    cells: Vec<Option<Glyph>>,
    dimension: Dimension,
}

impl Grid {
    /// Create an empty grid; negative sizes are clamped to zero
    pub fn new(rows: i32, cols: i32) -> Self {
        let mut grid = Self {
            cells: Vec::new(),
            dimension: Dimension::default(),
        };
        grid.resize(rows, cols);
        grid
    }

    /// Reallocate to `rows x cols`, discarding all content
    ///
    /// Negative sizes are clamped to zero rather than rejected, so a layout
    /// computed from a display smaller than its padding yields an empty grid.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        if rows < 0 || cols < 0 {
            debug!("Clamping negative grid size {}x{} to zero", rows, cols);
        }
        let dimension = Dimension::new(cols.max(0) as usize, rows.max(0) as usize);
        self.cells = vec![None; dimension.cell_count()];
        self.dimension = dimension;
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        self.dimension.contains(row, col)
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.in_bounds(row, col) {
            Some(row as usize * self.dimension.cols + col as usize)
        } else {
            None
        }
    }

    /// Glyph at (row, col), or `None` if empty or out of bounds
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Option<Glyph> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Store a glyph (or `None` to clear); out of bounds is ignored
    #[inline]
    pub fn set(&mut self, row: i32, col: i32, glyph: impl Into<Option<Glyph>>) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = glyph.into();
        }
    }

    /// Write `glyph` (or clear, with `None`) into every cell
    pub fn fill(&mut self, glyph: impl Into<Option<Glyph>>) {
        let glyph = glyph.into();
        self.cells.iter_mut().for_each(|cell| *cell = glyph);
    }

    /// Write `glyph` into every cell on the outer border
    pub fn outline(&mut self, glyph: Glyph) {
        let Dimension { cols, rows } = self.dimension;
        if rows == 0 || cols == 0 {
            return;
        }
        let (last_row, last_col) = (rows as i32 - 1, cols as i32 - 1);
        self.draw_rect(0, 0, last_row, last_col, glyph);
    }

    /// Fill the inclusive rectangle `(r0, c0)..=(r1, c1)`
    pub fn fill_rect(&mut self, r0: i32, c0: i32, r1: i32, c1: i32, glyph: Glyph) {
        let Dimension { cols, rows } = self.dimension;
        let (r0, r1) = (r0.max(0), r1.min(rows as i32 - 1));
        let (c0, c1) = (c0.max(0), c1.min(cols as i32 - 1));
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(row, col, glyph);
            }
        }
    }

    /// Draw the border of the inclusive rectangle `(r0, c0)..=(r1, c1)`
    ///
    /// Horizontal edges span the full width; vertical edges cover only the
    /// rows strictly between them, so corners are written once.
    /// Edges outside the grid are skipped and the rest are clipped to it.
    pub fn draw_rect(&mut self, r0: i32, c0: i32, r1: i32, c1: i32, glyph: Glyph) {
        let (rows, cols) = (self.dimension.rows as i32, self.dimension.cols as i32);

        let (h0, h1) = (c0.max(0), c1.min(cols - 1));
        for row in [r0, r1] {
            if (0..rows).contains(&row) {
                for col in h0..=h1 {
                    self.set(row, col, glyph);
                }
            }
        }

        let (v0, v1) = (r0.saturating_add(1).max(0), r1.min(rows));
        for col in [c0, c1] {
            if (0..cols).contains(&col) {
                for row in v0..v1 {
                    self.set(row, col, glyph);
                }
            }
        }
    }

    /// Write `glyphs[i]` at `positions[i]` for every i
    ///
    /// Fails without touching any cell if the slices differ in length.
    pub fn set_batch(&mut self, positions: &[(i32, i32)], glyphs: &[Glyph]) -> ScreenResult<()> {
        check_batch(positions, glyphs)?;
        for (&(row, col), &glyph) in positions.iter().zip(glyphs) {
            self.set(row, col, glyph);
        }
        Ok(())
    }

    /// Write `text` left to right from (row, col), one glyph per character
    ///
    /// Stops at the right edge; there is no wraparound. Returns the number of
    /// cells actually written.
    pub fn write_text(&mut self, row: i32, col: i32, text: &str, fg: Color, bg: Color) -> usize {
        let cols = self.dimension.cols as i32;
        let mut written = 0;
        for (offset, ch) in text.chars().enumerate() {
            let c = col.saturating_add(offset as i32);
            if c >= cols {
                break;
            }
            if self.in_bounds(row, c) {
                self.set(row, c, Glyph::new(ch, fg, bg));
                written += 1;
            }
        }
        written
    }

    /// Occupied cells in row-major order as `(row, col, glyph)`
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Glyph)> + '_ {
        let cols = self.dimension.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|glyph| (i / cols, i % cols, glyph)))
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// Reject a batch whose position and glyph counts differ
pub(crate) fn check_batch(positions: &[(i32, i32)], glyphs: &[Glyph]) -> ScreenResult<()> {
    if positions.len() != glyphs.len() {
        return Err(ScreenError::BatchLengthMismatch {
            positions: positions.len(),
            glyphs: glyphs.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(grid: &Grid) -> Vec<Option<Glyph>> {
        grid.cells.clone()
    }

    #[test]
    fn test_fill_then_get_every_cell() {
        let mut grid = Grid::new(4, 7);
        grid.fill(Glyph::SPACE);
        for row in 0..4 {
            for col in 0..7 {
                assert_eq!(grid.get(row, col), Some(Glyph::SPACE));
            }
        }
        grid.fill(None);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_outline_5x5_leaves_center_untouched() {
        let mut grid = Grid::new(5, 5);
        grid.fill(Glyph::SPACE);
        grid.outline(Glyph::WALL);

        for row in 0..5 {
            for col in 0..5 {
                let border = row == 0 || row == 4 || col == 0 || col == 4;
                let expected = if border { Glyph::WALL } else { Glyph::SPACE };
                assert_eq!(grid.get(row, col), Some(expected), "cell ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_outline_single_row_and_empty_grid() {
        let mut grid = Grid::new(1, 3);
        grid.outline(Glyph::WALL);
        assert_eq!(grid.occupied_count(), 3);

        let mut empty = Grid::new(0, 0);
        empty.outline(Glyph::WALL);
        assert_eq!(empty.occupied_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_get_and_set() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 0, Glyph::PLAYER);

        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(0, 3), None);

        grid.set(-1, 0, Glyph::WALL);
        grid.set(3, 0, Glyph::WALL);
        grid.set(0, 3, Glyph::WALL);
        assert_eq!(grid.get(0, 0), Some(Glyph::PLAYER));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_resize_discards_content() {
        let mut grid = Grid::new(2, 2);
        grid.fill(Glyph::WALL);
        grid.resize(2, 2);
        assert_eq!(grid.dimension(), Dimension::new(2, 2));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_negative_resize_clamps_to_zero() {
        let mut grid = Grid::new(3, 3);
        grid.resize(-2, 5);
        assert_eq!(grid.dimension(), Dimension::new(5, 0));

        grid.resize(4, -1);
        assert_eq!(grid.dimension(), Dimension::new(0, 4));
        assert_eq!(grid.get(0, 0), None);
        grid.set(0, 0, Glyph::WALL);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_fill_rect_is_inclusive_and_clipped() {
        let mut grid = Grid::new(4, 4);
        grid.fill_rect(1, 1, 2, 2, Glyph::WALL);
        assert_eq!(grid.occupied_count(), 4);
        assert_eq!(grid.get(2, 2), Some(Glyph::WALL));
        assert_eq!(grid.get(3, 3), None);

        grid.fill_rect(-5, -5, 0, 0, Glyph::PLAYER);
        assert_eq!(grid.get(0, 0), Some(Glyph::PLAYER));
        assert_eq!(grid.occupied_count(), 5);
    }

    #[test]
    fn test_draw_rect_border_only() {
        let mut grid = Grid::new(5, 6);
        grid.draw_rect(1, 1, 3, 4, Glyph::WALL);

        // 2 full rows of 4 + 2 side cells on the single middle row
        assert_eq!(grid.occupied_count(), 10);
        assert_eq!(grid.get(2, 1), Some(Glyph::WALL));
        assert_eq!(grid.get(2, 4), Some(Glyph::WALL));
        assert_eq!(grid.get(2, 2), None);
        assert_eq!(grid.get(0, 0), None);
    }

    #[test]
    fn test_draw_rect_partly_off_grid_is_clipped() {
        let mut grid = Grid::new(3, 3);
        grid.draw_rect(-1, 1, 1, 5, Glyph::WALL);

        // Top edge is off grid; bottom edge row 1 cols 1..=2, left side (0, 1)
        assert_eq!(grid.get(1, 1), Some(Glyph::WALL));
        assert_eq!(grid.get(1, 2), Some(Glyph::WALL));
        assert_eq!(grid.get(0, 1), Some(Glyph::WALL));
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_draw_rect_far_outside_grid() {
        let mut grid = Grid::new(3, 3);
        grid.draw_rect(i32::MAX, 0, i32::MAX, 2, Glyph::WALL);
        grid.draw_rect(i32::MIN, i32::MIN, i32::MIN, i32::MIN, Glyph::WALL);
        assert_eq!(grid.occupied_count(), 0);

        let started = std::time::Instant::now();
        grid.draw_rect(0, -200_000_000, 2, 200_000_000, Glyph::WALL);
        assert!(started.elapsed() < std::time::Duration::from_millis(100));
        // Both horizontal edges fully visible; the sides are off grid
        assert_eq!(grid.occupied_count(), 6);
        assert_eq!(grid.get(1, 1), None);
    }

    #[test]
    fn test_set_batch_mismatch_is_rejected_without_mutation() {
        let mut grid = Grid::new(3, 3);
        grid.fill(Glyph::SPACE);
        let before = snapshot(&grid);

        let result = grid.set_batch(&[(0, 0), (1, 1), (2, 2)], &[Glyph::WALL, Glyph::WALL]);
        assert_eq!(
            result,
            Err(ScreenError::BatchLengthMismatch {
                positions: 3,
                glyphs: 2
            })
        );
        assert_eq!(snapshot(&grid), before);
    }

    #[test]
    fn test_set_batch_writes_all_positions() {
        let mut grid = Grid::new(3, 3);
        grid.set_batch(&[(0, 0), (2, 2), (9, 9)], &[Glyph::WALL, Glyph::PLAYER, Glyph::WALL])
            .unwrap();
        assert_eq!(grid.get(0, 0), Some(Glyph::WALL));
        assert_eq!(grid.get(2, 2), Some(Glyph::PLAYER));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_write_text_truncates_at_right_edge() {
        let mut grid = Grid::new(2, 5);
        let written = grid.write_text(1, 2, "hello", Color::GREEN, Color::BLACK);
        assert_eq!(written, 3);
        assert_eq!(grid.get(1, 2).map(|g| g.ch), Some('h'));
        assert_eq!(grid.get(1, 4).map(|g| g.ch), Some('l'));
        // No wraparound onto the next row
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_write_text_counts_chars_not_bytes() {
        let mut grid = Grid::new(1, 10);
        let written = grid.write_text(0, 0, "╔═╗", Color::CYAN, Color::BLACK);
        assert_eq!(written, 3);
        assert_eq!(grid.get(0, 1).map(|g| g.ch), Some('═'));
    }

    #[test]
    fn test_write_text_starting_left_of_grid() {
        let mut grid = Grid::new(1, 4);
        let written = grid.write_text(0, -2, "abcd", Color::WHITE, Color::BLACK);
        assert_eq!(written, 2);
        assert_eq!(grid.get(0, 0).map(|g| g.ch), Some('c'));
    }

    #[test]
    fn test_occupied_reports_coordinates() {
        let mut grid = Grid::new(3, 4);
        grid.set(1, 3, Glyph::PLAYER);
        grid.set(2, 0, Glyph::WALL);
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, vec![(1, 3, Glyph::PLAYER), (2, 0, Glyph::WALL)]);
    }
}
