use super::{Color, DrawSurface};
use crate::font::FontMetrics;
use crate::screen::ScreenState;

/// Draw every occupied cell of `state` onto `surface`
///
/// Cells are visited in row-major order. A cell whose background differs from
/// `default_background` gets its full rectangle filled first. The character is
/// centered horizontally on its advance and vertically on the font's
/// ascent/descent box. Empty cells are skipped entirely.
///
/// The caller holds the screen's read lock for the whole sweep, so the drawn
/// content always matches the layout it was placed with. Returns the number of
/// characters drawn.
pub fn render_sweep(
    state: &ScreenState,
    metrics: &dyn FontMetrics,
    surface: &mut dyn DrawSurface,
    default_background: Color,
) -> usize {
    let layout = state.layout();
    let cell = layout.cell_size();
    let ascent = metrics.ascent();
    let descent = metrics.descent();
    let baseline_offset = (cell.height as f32 + ascent - descent) / 2.0;

    let mut drawn = 0;
    for (row, col, glyph) in state.grid().occupied() {
        let (x, y) = layout.cell_origin(row, col);

        if glyph.bg != default_background {
            surface.fill_rect(x, y, cell.width, cell.height, glyph.bg);
        }

        let char_x = x as f32 + cell.width as f32 / 2.0 - metrics.advance(glyph.ch) / 2.0;
        surface.draw_char(glyph.ch, char_x, y as f32 + baseline_offset, glyph.fg);
        drawn += 1;
    }

    log::trace!("Swept {} glyphs", drawn);
    drawn
}

#[cfg(test)]
mod tests {
    use crate::geometry::{Padding, Size};
    use crate::glyph::Glyph;
    use crate::renderer::Color;
    use crate::screen::{ScreenConfig, TermScreen};
    use crate::test_support::{FixedMetrics, RecordingSurface};

    fn screen(display: Size, inner: i32) -> TermScreen {
        TermScreen::initialize(ScreenConfig {
            cell_size: Size::new(10, 20),
            display_size: display,
            inner_padding: Padding::uniform(inner),
            ..ScreenConfig::default()
        })
    }

    #[test]
    fn test_sweep_positions_single_glyph() {
        let screen = screen(Size::new(100, 100), 0);
        screen.set(1, 2, Glyph::PLAYER);

        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(100, 100));
        assert_eq!(screen.render(&mut surface, &metrics), 1);

        // 10x5 cells, outer padding (0, 0)
        // x = 20 + 10/2 - 6/2 = 22, baseline = 20 + (20 + 14 - 4)/2 = 35
        assert_eq!(surface.chars(), vec![('@', 22.0, 35.0, Color::WHITE)]);
        assert!(surface.rects().is_empty());
    }

    #[test]
    fn test_sweep_includes_padding_offsets() {
        // usable 85x85 -> 8x4 cells, leftover (5, 5) -> outer (2, 2)
        let screen = screen(Size::new(95, 95), 5);
        screen.set(0, 0, Glyph::WALL);

        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(95, 95));
        screen.render(&mut surface, &metrics);

        let (_, x, baseline, _) = surface.chars()[0];
        assert_eq!(x, 7.0 + 5.0 - 3.0);
        assert_eq!(baseline, 7.0 + 15.0);
    }

    #[test]
    fn test_sweep_skips_empty_cells_in_row_major_order() {
        let screen = screen(Size::new(50, 60), 0);
        screen.set(2, 0, Glyph::WALL.with_char('c'));
        screen.set(0, 4, Glyph::WALL.with_char('b'));
        screen.set(0, 1, Glyph::WALL.with_char('a'));

        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(50, 60));
        assert_eq!(screen.render(&mut surface, &metrics), 3);

        let order: String = surface.chars().iter().map(|c| c.0).collect();
        assert_eq!(order, "abc");
    }

    #[test]
    fn test_sweep_fills_non_default_background_first() {
        let screen = screen(Size::new(50, 50), 0);
        let highlighted = Glyph::new('!', Color::BLACK, Color::GREEN);
        screen.set(1, 1, highlighted);
        screen.set(0, 0, Glyph::SPACE);

        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(50, 50));
        screen.render(&mut surface, &metrics);

        assert_eq!(surface.rects(), vec![(10, 20, 10, 20, Color::GREEN)]);
        // background rectangle precedes its character
        let rect_at = surface
            .calls
            .iter()
            .position(|c| matches!(c, crate::test_support::DrawCall::Rect { .. }));
        let char_at = surface
            .calls
            .iter()
            .position(|c| matches!(c, crate::test_support::DrawCall::Char { ch: '!', .. }));
        assert!(rect_at < char_at);
    }

    #[test]
    fn test_sweep_empty_screen_draws_nothing() {
        let screen = screen(Size::new(50, 50), 0);
        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(50, 50));
        assert_eq!(screen.render(&mut surface, &metrics), 0);
        assert!(surface.calls.is_empty());
    }
}
