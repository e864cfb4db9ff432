use crate::types::{CellSize, Pixel};

/// A rasterized glyph as a grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    cell: CellSize,
    /// Pixel values in row-major order.
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// An all-background grid.
    pub fn blank(cell: CellSize) -> Self {
        PixelGrid {
            cell,
            pixels: vec![Pixel::Background; cell.bits()],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(cell: CellSize, mut f: impl FnMut(usize, usize) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity(cell.bits());
        for y in 0..cell.height() {
            for x in 0..cell.width() {
                pixels.push(f(x, y));
            }
        }
        PixelGrid { cell, pixels }
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    pub fn width(&self) -> usize {
        self.cell.width()
    }

    pub fn height(&self) -> usize {
        self.cell.height()
    }

    /// Get the pixel at position (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.cell.width() + x]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        let w = self.cell.width();
        self.pixels[y * w + x] = pixel;
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_foreground()).count()
    }

    /// Render as text, one line per row, `#` for foreground and `.` for background.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in self.pixels.chunks(self.width()) {
            for p in row {
                out.push(if p.is_foreground() { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
