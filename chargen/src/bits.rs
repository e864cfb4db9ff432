use crate::grid::PixelGrid;
use crate::types::{CellSize, CodeWord, Pixel};

/// A pixel location in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLocation {
    pub x: usize,
    pub y: usize,
}

/// Bit number for the pixel at (x, y): `W * x + y`.
///
/// This is column-major and is the format hardware consumers of the
/// generated tables read, so it must not change.
#[inline]
pub fn bit_index(cell: CellSize, x: usize, y: usize) -> usize {
    cell.width() * x + y
}

/// Pixel location for bit `i`: `(i / W, i % W)`.
#[inline]
pub fn bit_location(cell: CellSize, i: usize) -> BitLocation {
    BitLocation {
        x: i / cell.width(),
        y: i % cell.width(),
    }
}

/// All pixel locations in bit order (bit 0 first).
pub fn bit_locations(cell: CellSize) -> Vec<BitLocation> {
    (0..cell.bits()).map(|i| bit_location(cell, i)).collect()
}

/// Pack a grid into a code word. Background pixels leave their bit clear.
pub fn encode(grid: &PixelGrid) -> CodeWord {
    let cell = grid.cell();
    let mut word: CodeWord = 0;
    for x in 0..cell.width() {
        for y in 0..cell.height() {
            if grid.pixel(x, y).is_foreground() {
                word |= 1 << bit_index(cell, x, y);
            }
        }
    }
    word
}

/// Unpack a code word into a grid. Bits at or above `cell.bits()` are ignored.
pub fn decode(word: CodeWord, cell: CellSize) -> PixelGrid {
    let mut grid = PixelGrid::blank(cell);
    for (i, loc) in bit_locations(cell).into_iter().enumerate() {
        if (word >> i) & 1 != 0 {
            grid.set(loc.x, loc.y, Pixel::Foreground);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_2x2() -> PixelGrid {
        let cell = CellSize::square(2).unwrap();
        let mut grid = PixelGrid::blank(cell);
        grid.set(0, 0, Pixel::Foreground);
        grid.set(1, 1, Pixel::Foreground);
        grid
    }

    #[test]
    fn diagonal_2x2_encodes_to_9() {
        assert_eq!(encode(&diagonal_2x2()), 0x9);
    }

    #[test]
    fn ordering_is_column_major() {
        let cell = CellSize::square(3).unwrap();

        // (x=0, y=1) is bit 1; (x=1, y=0) is bit 3
        let mut grid = PixelGrid::blank(cell);
        grid.set(0, 1, Pixel::Foreground);
        assert_eq!(encode(&grid), 1 << 1);

        let mut grid = PixelGrid::blank(cell);
        grid.set(1, 0, Pixel::Foreground);
        assert_eq!(encode(&grid), 1 << 3);

        let locs: Vec<(usize, usize)> = bit_locations(cell).iter().map(|l| (l.x, l.y)).collect();
        let expected = vec![
            (0, 0), (0, 1), (0, 2),
            (1, 0), (1, 1), (1, 2),
            (2, 0), (2, 1), (2, 2),
        ];
        assert_eq!(locs, expected);
    }

    #[test]
    fn bit_index_and_location_are_inverse() {
        let cell = CellSize::default();
        for i in 0..cell.bits() {
            let loc = bit_location(cell, i);
            assert_eq!(bit_index(cell, loc.x, loc.y), i);
        }
    }

    #[test]
    fn encode_is_bijective_for_small_cells() {
        for side in [2usize, 3] {
            let cell = CellSize::square(side).unwrap();
            let total: CodeWord = 1 << cell.bits();
            let mut seen = vec![false; total as usize];

            for pattern in 0..total {
                // Build the grid from a row-major pattern so the encoder's
                // column-major order is actually exercised.
                let grid = PixelGrid::from_fn(cell, |x, y| {
                    if (pattern >> (y * side + x)) & 1 != 0 {
                        Pixel::Foreground
                    } else {
                        Pixel::Background
                    }
                });
                let word = encode(&grid);
                assert!(word < total, "word {word:#x} out of range for {side}x{side}");
                assert!(!seen[word as usize], "word {word:#x} produced twice");
                seen[word as usize] = true;

                assert_eq!(decode(word, cell), grid);
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn full_8x8_cell_sets_all_64_bits() {
        let cell = CellSize::default();
        let grid = PixelGrid::from_fn(cell, |_, _| Pixel::Foreground);
        assert_eq!(encode(&grid), u64::MAX as CodeWord);
    }

    #[test]
    fn decode_ignores_bits_beyond_cell() {
        let cell = CellSize::square(2).unwrap();
        let grid = decode(0xf9, cell);
        assert_eq!(grid, diagonal_2x2());
    }
}
