use log::{debug, info, warn};

use crate::bits;
use crate::config::GeneratorConfig;
use crate::error::RenderError;
use crate::grid::PixelGrid;
use crate::raster::Rasterizer;
use crate::types::{CellSize, CodeWord};

/// What to do when the font cannot rasterize a codepoint in the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MissingGlyph {
    /// Fail the whole run on the first missing glyph.
    #[default]
    Abort,
    /// Store an all-background glyph (word 0) and continue.
    Blank,
}

/// One code word per character, addressed by position in the codepoint range.
///
/// Append-only; the serializer reads it once, in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterTable {
    cell: CellSize,
    words: Vec<CodeWord>,
}

impl CharacterTable {
    pub fn new(cell: CellSize) -> Self {
        CharacterTable {
            cell,
            words: Vec::new(),
        }
    }

    pub fn with_capacity(cell: CellSize, capacity: usize) -> Self {
        CharacterTable {
            cell,
            words: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, word: CodeWord) {
        self.words.push(word);
    }

    /// Encode `grid` and append it.
    ///
    /// # Panics
    ///
    /// Panics if the grid's cell differs from the table's.
    pub fn push_grid(&mut self, grid: &PixelGrid) {
        assert_eq!(grid.cell(), self.cell, "grid cell does not match table cell");
        self.push(bits::encode(grid));
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    pub fn words(&self) -> &[CodeWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of entries (MIF `DEPTH`).
    pub fn depth(&self) -> usize {
        self.words.len()
    }

    /// Bits per entry (MIF `WIDTH`).
    pub fn width(&self) -> usize {
        self.cell.bits()
    }
}

/// Rasterize and encode every codepoint in the configured range, in order.
pub fn build_table(
    rasterizer: &impl Rasterizer,
    config: &GeneratorConfig,
) -> Result<CharacterTable, RenderError> {
    let mut table = CharacterTable::with_capacity(config.cell, config.range.len());

    for codepoint in config.range.iter() {
        let grid = match rasterizer.rasterize(codepoint, config.cell, config.offset) {
            Ok(grid) => grid,
            Err(RenderError::UnsupportedGlyph(cp)) if config.missing_glyph == MissingGlyph::Blank => {
                warn!("no glyph for U+{:04X}, storing a blank cell", cp);
                PixelGrid::blank(config.cell)
            }
            Err(e) => return Err(e),
        };
        if grid.cell() != config.cell {
            return Err(RenderError::WrongSize {
                codepoint,
                width: config.cell.width(),
                height: config.cell.height(),
                got_width: grid.width(),
                got_height: grid.height(),
            });
        }

        table.push_grid(&grid);
        debug!(
            "U+{:04X} {:?} -> {:x}",
            codepoint,
            char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER),
            table.words()[table.len() - 1]
        );
    }

    info!(
        "built table of {} entries ({} bits each)",
        table.depth(),
        table.width()
    );
    Ok(table)
}
