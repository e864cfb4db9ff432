//! PNG rendering for single glyphs and glyph sheets.

use anyhow::{Context, Result};
use chargen::grid::PixelGrid;
use std::path::Path;

/// Write a single glyph as a PNG file with the given scale and border.
pub fn write_glyph_png(grid: &PixelGrid, scale: usize, border: usize, path: &Path) -> Result<()> {
    let img = grid_to_image(grid, scale, border);
    write_grayscale_png(path, &img.pixels, img.width, img.height)
}

/// Write every glyph of a table as one PNG sheet, `columns` glyphs per row.
pub fn write_sheet_png(
    grids: &[PixelGrid],
    scale: usize,
    spacing: usize,
    columns: usize,
    output_path: &Path,
) -> Result<()> {
    anyhow::ensure!(!grids.is_empty(), "no glyphs to render");
    anyhow::ensure!(scale > 0 && columns > 0, "scale and columns must be positive");

    let nglyphs = grids.len();
    let cols = columns.min(nglyphs);
    let rows = nglyphs.div_ceil(cols);

    // 1-pixel border on each side of every glyph
    let cell = grids[0].cell();
    let glyph_w = (cell.width() + 2) * scale;
    let glyph_h = (cell.height() + 2) * scale;
    let spacing_px = spacing * scale;

    let img_width = cols * glyph_w + cols.saturating_sub(1) * spacing_px;
    let img_height = rows * glyph_h + rows.saturating_sub(1) * spacing_px;

    // Gray gutter so cell boundaries stay visible
    let mut pixels = vec![160u8; img_width * img_height];

    for (idx, grid) in grids.iter().enumerate() {
        let x_off = (idx % cols) * (glyph_w + spacing_px);
        let y_off = (idx / cols) * (glyph_h + spacing_px);
        let img = grid_to_image(grid, scale, 1);

        for y in 0..img.height {
            for x in 0..img.width {
                let dst_x = x_off + x;
                let dst_y = y_off + y;
                if dst_x < img_width && dst_y < img_height {
                    pixels[dst_y * img_width + dst_x] = img.pixels[y * img.width + x];
                }
            }
        }
    }

    write_grayscale_png(output_path, &pixels, img_width, img_height)
}

struct GrayImage {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

/// Convert a glyph to a grayscale image: black ink on white.
fn grid_to_image(grid: &PixelGrid, scale: usize, border: usize) -> GrayImage {
    let width = (grid.width() + 2 * border) * scale;
    let height = (grid.height() + 2 * border) * scale;
    let mut pixels = vec![255u8; width * height];

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !grid.pixel(x, y).is_foreground() {
                continue;
            }
            let ox = (x + border) * scale;
            let oy = (y + border) * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    pixels[(oy + sy) * width + (ox + sx)] = 0;
                }
            }
        }
    }

    GrayImage {
        pixels,
        width,
        height,
    }
}

fn write_grayscale_png(path: &Path, pixels: &[u8], width: usize, height: usize) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header for {}", path.display()))?;
    writer
        .write_image_data(pixels)
        .with_context(|| format!("writing PNG data for {}", path.display()))?;

    Ok(())
}
