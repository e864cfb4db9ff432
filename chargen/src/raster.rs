//! Glyph rasterization onto a fixed monochrome cell.
//!
//! The [`Rasterizer`] trait is the seam to the font engine. [`FontRasterizer`]
//! implements it with `fontdue`, forcing every pixel to pure foreground or
//! pure background.

use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::error::RenderError;
use crate::grid::PixelGrid;
use crate::types::{CellSize, Offset, Pixel};

/// Canvas value of an untouched pixel.
pub const BACKGROUND: u8 = 0;
/// Canvas value of a painted pixel.
pub const FOREGROUND: u8 = 255;
/// Minimum glyph coverage that paints a pixel.
pub const COVERAGE_THRESHOLD: u8 = 128;

/// Produces a binary pixel grid of exactly `cell` size for a codepoint.
pub trait Rasterizer {
    fn rasterize(
        &self,
        codepoint: u32,
        cell: CellSize,
        offset: Offset,
    ) -> Result<PixelGrid, RenderError>;
}

/// An 8-bit coverage bitmap for one glyph, positioned relative to the canvas.
#[derive(Debug, Clone)]
pub struct GlyphBitmap<'a> {
    /// Canvas column of the bitmap's left edge.
    pub left: i64,
    /// Canvas row of the bitmap's top edge.
    pub top: i64,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage values (0 = none, 255 = full).
    pub coverage: &'a [u8],
}

/// Clear a canvas to background and paint the glyph without antialiasing.
///
/// Coverage at or above [`COVERAGE_THRESHOLD`] becomes [`FOREGROUND`];
/// everything else stays [`BACKGROUND`]. Glyph pixels falling outside the
/// canvas are clipped.
pub fn paint_monochrome(cell: CellSize, glyph: &GlyphBitmap) -> Vec<u8> {
    let (cw, ch) = (cell.width() as i64, cell.height() as i64);
    let mut canvas = vec![BACKGROUND; cell.bits()];

    for gy in 0..glyph.height {
        let cy = glyph.top + gy as i64;
        if cy < 0 || cy >= ch {
            continue;
        }
        for gx in 0..glyph.width {
            let cx = glyph.left + gx as i64;
            if cx < 0 || cx >= cw {
                continue;
            }
            if glyph.coverage[gy * glyph.width + gx] >= COVERAGE_THRESHOLD {
                canvas[(cy * cw + cx) as usize] = FOREGROUND;
            }
        }
    }

    canvas
}

/// Canvas position `(left, top)` of a glyph bitmap.
///
/// `offset` is the top-left of the line box, so the baseline sits `ascent`
/// rows below it. `xmin`/`ymin` are fontdue's bitmap origin relative to the
/// pen position, with `ymin` measured upward from the baseline to the
/// bitmap's bottom edge. Computed in `i64` so any `i32` offset is clipped
/// rather than overflowing.
pub fn place(offset: Offset, ascent: i32, xmin: i32, ymin: i32, height: usize) -> (i64, i64) {
    let baseline = offset.dy as i64 + ascent as i64;
    let left = offset.dx as i64 + xmin as i64;
    let top = baseline - (ymin as i64 + height as i64);
    (left, top)
}

/// The glyph to draw for `codepoint`, given the font's glyph-index lookup.
///
/// Non-scalar codepoints and glyph index 0 (`.notdef`) are unsupported.
pub fn resolve_char(
    codepoint: u32,
    lookup_glyph_index: impl Fn(char) -> u16,
) -> Result<char, RenderError> {
    match char::from_u32(codepoint) {
        Some(ch) if lookup_glyph_index(ch) != 0 => Ok(ch),
        _ => Err(RenderError::UnsupportedGlyph(codepoint)),
    }
}

/// Sample a canvas: any pixel that differs from the background is foreground.
pub fn classify(cell: CellSize, canvas: &[u8]) -> PixelGrid {
    PixelGrid::from_fn(cell, |x, y| {
        if canvas[y * cell.width() + x] != BACKGROUND {
            Pixel::Foreground
        } else {
            Pixel::Background
        }
    })
}

/// A TrueType/OpenType font loaded once and rasterized at a fixed size.
pub struct FontRasterizer {
    font: Font,
    px: f32,
}

impl FontRasterizer {
    /// Load a font file.
    pub fn open(path: impl AsRef<Path>, point_size: f32) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            RenderError::RenderingUnavailable(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_bytes(data, point_size)
    }

    /// Parse a font from memory.
    pub fn from_bytes(data: Vec<u8>, point_size: f32) -> Result<Self, RenderError> {
        if !(point_size.is_finite() && point_size > 0.0) {
            return Err(RenderError::RenderingUnavailable(format!(
                "invalid point size {}",
                point_size
            )));
        }
        let settings = FontSettings {
            scale: point_size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings)
            .map_err(|e| RenderError::RenderingUnavailable(e.to_string()))?;
        Ok(FontRasterizer {
            font,
            px: point_size,
        })
    }

    pub fn point_size(&self) -> f32 {
        self.px
    }

    /// Distance from the top of the line box to the baseline, in pixels.
    fn ascent(&self) -> i32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|m| m.ascent)
            .unwrap_or(self.px)
            .round() as i32
    }
}

impl Rasterizer for FontRasterizer {
    fn rasterize(
        &self,
        codepoint: u32,
        cell: CellSize,
        offset: Offset,
    ) -> Result<PixelGrid, RenderError> {
        let ch = resolve_char(codepoint, |c| self.font.lookup_glyph_index(c))?;
        let (metrics, coverage) = self.font.rasterize(ch, self.px);

        let (left, top) = place(
            offset,
            self.ascent(),
            metrics.xmin,
            metrics.ymin,
            metrics.height,
        );
        let glyph = GlyphBitmap {
            left,
            top,
            width: metrics.width,
            height: metrics.height,
            coverage: &coverage,
        };

        let canvas = paint_monochrome(cell, &glyph);
        Ok(classify(cell, &canvas))
    }
}
