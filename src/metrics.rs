//! Surface metrics: pixel-sized drawing surface -> character grid.

/// Fixed-width glyph cell size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    pub width: f32,
    pub height: f32,
}

impl GlyphMetrics {
    /// Derive glyph size from a terminal that reports both pixel and cell
    /// dimensions. Returns None when the terminal reports no pixel size
    /// (common over SSH), in which case a cell is simply a cell.
    pub fn measure(px_w: u16, px_h: u16, cols: u16, rows: u16) -> Option<Self> {
        if px_w == 0 || px_h == 0 || cols == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            width: px_w as f32 / cols as f32,
            height: px_h as f32 / rows as f32,
        })
    }
}

/// Number of whole character cells that fit on a pixel surface, never
/// degenerating below 1x1.
pub fn grid_size(px_w: f32, px_h: f32, glyph: GlyphMetrics) -> (usize, usize) {
    let cols = (px_w / glyph.width).floor() as usize;
    let rows = (px_h / glyph.height).floor() as usize;
    (cols.max(1), rows.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_floors() {
        let glyph = GlyphMetrics {
            width: 8.0,
            height: 16.0,
        };
        assert_eq!(grid_size(645.0, 400.0, glyph), (80, 25));
        assert_eq!(grid_size(640.0, 400.0, glyph), (80, 25));
        assert_eq!(grid_size(639.0, 399.0, glyph), (79, 24));
    }

    #[test]
    fn grid_size_never_degenerates() {
        let glyph = GlyphMetrics {
            width: 8.0,
            height: 16.0,
        };
        assert_eq!(grid_size(2.0, 3.0, glyph), (1, 1));
    }

    #[test]
    fn measure_rejects_zero_reports() {
        assert!(GlyphMetrics::measure(0, 0, 80, 24).is_none());
        let m = GlyphMetrics::measure(640, 384, 80, 24).unwrap();
        assert_eq!(m.width, 8.0);
        assert_eq!(m.height, 16.0);
    }
}
