use crate::error::CellError;

/// A packed glyph bitmap. Bit `i` is the pixel at `(i / W, i % W)`.
pub type CodeWord = u128;

/// Largest number of pixels a cell may hold (bits in a [`CodeWord`]).
pub const MAX_CELL_BITS: usize = CodeWord::BITS as usize;

/// A single pixel of a rasterized glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    /// Drawn by the glyph.
    Foreground,
    /// Untouched canvas.
    Background,
}

impl Pixel {
    pub fn is_foreground(self) -> bool {
        self == Pixel::Foreground
    }
}

/// Dimensions of the fixed glyph cell in pixels.
///
/// The cell is square: the bit index `W * x + y` used by the encoder is
/// only unique and below `W * H` when both sides match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    width: usize,
    height: usize,
}

impl CellSize {
    pub fn new(width: usize, height: usize) -> Result<Self, CellError> {
        if width == 0 || height == 0 {
            return Err(CellError::Empty(width, height));
        }
        if width != height {
            return Err(CellError::NotSquare(width, height));
        }
        let bits = width.checked_mul(height).filter(|&b| b <= MAX_CELL_BITS);
        if bits.is_none() {
            return Err(CellError::TooManyBits {
                width,
                height,
                bits: width.saturating_mul(height),
            });
        }
        Ok(CellSize { width, height })
    }

    /// A `side` x `side` cell.
    pub fn square(side: usize) -> Result<Self, CellError> {
        CellSize::new(side, side)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bits per code word (`width * height`).
    pub fn bits(&self) -> usize {
        self.width * self.height
    }
}

impl Default for CellSize {
    fn default() -> Self {
        CellSize {
            width: 8,
            height: 8,
        }
    }
}

/// Position at which the glyph's line box is drawn on the canvas.
///
/// Negative values shift the glyph up/left to compensate for font metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Offset { dx, dy }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::new(-1, -4)
    }
}

/// Inclusive range of codepoints. `last < first` is the empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange {
    pub first: u32,
    pub last: u32,
}

impl CodepointRange {
    pub const fn new(first: u32, last: u32) -> Self {
        CodepointRange { first, last }
    }

    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.last - self.first) as usize + 1
        }
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }
}

impl Default for CodepointRange {
    /// Printable ASCII.
    fn default() -> Self {
        CodepointRange::new(32, 126)
    }
}
