use crate::geometry::Size;
use anyhow::Result;
use fontdue::{Font, FontSettings, Metrics};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Font measurements consumed by the layout engine and the render sweep
pub trait FontMetrics {
    /// Pixel footprint of one character cell
    fn cell_size(&self) -> Size;
    /// Distance from the baseline to the top of the tallest glyph
    fn ascent(&self) -> f32;
    /// Distance from the baseline to the bottom of the lowest glyph (positive)
    fn descent(&self) -> f32;
    /// Horizontal advance of `ch`
    fn advance(&self, ch: char) -> f32;
}

/// A rasterized glyph: fontdue metrics plus an 8-bit coverage bitmap
pub type RasterizedGlyph = Arc<(Metrics, Vec<u8>)>;

/// Manages font loading, metrics and glyph rasterization
pub struct FontManager {
    font: Font,
    font_size: f32,
    cell_size: Size,
    ascent: f32,
    descent: f32,
    /// Cache of rasterized glyphs keyed by character
    glyph_cache: Mutex<HashMap<char, RasterizedGlyph>>,
}

impl FontManager {
    /// Load a font from `path`, falling back to common system monospace fonts
    pub fn new(path: Option<&str>, font_size: f32) -> Result<Self> {
        let font_data = Self::load_font_data(path)?;
        Self::from_bytes(font_data, font_size)
    }

    /// Build from raw TTF/OTF bytes
    pub fn from_bytes(font_data: Vec<u8>, font_size: f32) -> Result<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to load font: {}", e))?;

        let line_metrics = font
            .horizontal_line_metrics(font_size)
            .ok_or_else(|| anyhow::anyhow!("Font has no horizontal line metrics"))?;
        let cell_width = font.metrics('M', font_size).advance_width.ceil() as i32;
        let cell_height =
            (line_metrics.ascent - line_metrics.descent + line_metrics.line_gap).ceil() as i32;

        info!(
            "Font loaded at size {}: cell {}x{}, ascent {:.1}, descent {:.1}",
            font_size, cell_width, cell_height, line_metrics.ascent, -line_metrics.descent
        );

        Ok(Self {
            font,
            font_size,
            cell_size: Size::new(cell_width, cell_height),
            ascent: line_metrics.ascent,
            descent: -line_metrics.descent,
            glyph_cache: Mutex::new(HashMap::new()),
        })
    }

    fn load_font_data(path: Option<&str>) -> Result<Vec<u8>> {
        if let Some(path) = path {
            match std::fs::read(path) {
                Ok(data) => {
                    info!("Loaded font from: {}", path);
                    return Ok(data);
                }
                Err(e) => warn!("Font file not found: {} ({}), using fallback font", path, e),
            }
        }

        let fallback_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/System/Library/Fonts/Monaco.ttf",
            "/System/Library/Fonts/Menlo.ttc",
            "C:\\Windows\\Fonts\\consola.ttf",
        ];

        for path in fallback_paths {
            if let Ok(data) = std::fs::read(path) {
                info!("Loaded font from: {}", path);
                return Ok(data);
            }
        }

        anyhow::bail!("Could not find any monospace font")
    }

    /// Get or rasterize a glyph
    pub fn glyph(&self, ch: char) -> RasterizedGlyph {
        let mut cache = self.glyph_cache.lock();
        cache
            .entry(ch)
            .or_insert_with(|| Arc::new(self.font.rasterize(ch, self.font_size)))
            .clone()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Clear glyph cache (useful for memory management)
    pub fn clear_cache(&self) {
        self.glyph_cache.lock().clear();
    }
}

impl FontMetrics for FontManager {
    fn cell_size(&self) -> Size {
        self.cell_size
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.font_size).advance_width
    }
}
