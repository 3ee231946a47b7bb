use super::{Color, DrawSurface};
use crate::font::FontMetrics;
use crate::stats::FrameStats;

const OVERLAY_X: i32 = 10;
const OVERLAY_Y: i32 = 10;
const OVERLAY_PADDING: i32 = 5;
const OVERLAY_BACKGROUND: Color = Color::rgba(25, 0, 0, 242);
const OVERLAY_TEXT: Color = Color::YELLOW;

/// Format the one-line frame statistics readout
pub fn format_debug_line(stats: &FrameStats) -> String {
    format!(
        "[F1 - hide] fps: {:3} | frame: {:04} ({:.4}ms) | update: {:.4}ms | render: {:.4}ms",
        stats.fps, stats.frame_count, stats.last_delta_ms, stats.update_ms, stats.render_ms
    )
}

/// Draw `text` on a dark translucent box in the top-left corner
pub fn draw_text_box(surface: &mut dyn DrawSurface, metrics: &dyn FontMetrics, text: &str) {
    let text_width: f32 = text.chars().map(|ch| metrics.advance(ch)).sum();
    let text_height = metrics.cell_size().height;

    surface.fill_rect(
        OVERLAY_X,
        OVERLAY_Y,
        text_width.ceil() as i32 + OVERLAY_PADDING * 2,
        text_height + OVERLAY_PADDING * 2,
        OVERLAY_BACKGROUND,
    );

    draw_text(
        surface,
        metrics,
        text,
        (OVERLAY_X + OVERLAY_PADDING) as f32,
        (OVERLAY_Y + OVERLAY_PADDING) as f32 + metrics.ascent(),
        OVERLAY_TEXT,
    );
}

/// Draw a run of text at a pixel position, advancing per character
///
/// Free-form text outside the cell grid, used by the overlay and by
/// applications drawing status lines.
pub fn draw_text(
    surface: &mut dyn DrawSurface,
    metrics: &dyn FontMetrics,
    text: &str,
    x: f32,
    baseline_y: f32,
    color: Color,
) {
    let mut pen = x;
    for ch in text.chars() {
        if !ch.is_whitespace() {
            surface.draw_char(ch, pen, baseline_y, color);
        }
        pen += metrics.advance(ch);
    }
}

/// Frame statistics overlay
pub fn draw_debug_overlay(
    surface: &mut dyn DrawSurface,
    metrics: &dyn FontMetrics,
    stats: &FrameStats,
) {
    draw_text_box(surface, metrics, &format_debug_line(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::test_support::{FixedMetrics, RecordingSurface};

    #[test]
    fn test_format_debug_line() {
        let mut stats = FrameStats::default();
        stats.fps = 60;
        stats.frame_count = 7;
        stats.last_delta_ms = 16.6667;
        stats.update_ms = 0.25;
        stats.render_ms = 2.5;

        assert_eq!(
            format_debug_line(&stats),
            "[F1 - hide] fps:  60 | frame: 0007 (16.6667ms) | update: 0.2500ms | render: 2.5000ms"
        );
    }

    #[test]
    fn test_text_box_geometry() {
        let metrics = FixedMetrics::default();
        let mut surface = RecordingSurface::new(Size::new(400, 100));
        draw_text_box(&mut surface, &metrics, "a b");

        // 3 chars * 6px advance + 2 * 5 padding, 20px line + 2 * 5 padding
        assert_eq!(
            surface.rects(),
            vec![(10, 10, 28, 30, Color::rgba(25, 0, 0, 242))]
        );
        let chars = surface.chars();
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0], ('a', 15.0, 29.0, Color::YELLOW));
        assert_eq!(chars[1], ('b', 27.0, 29.0, Color::YELLOW));
    }
}
