/// End-to-end tests: rasterize → encode → build table → serialize → parse.
use chargen::bits;
use chargen::config::GeneratorConfig;
use chargen::error::{MifError, RenderError};
use chargen::grid::PixelGrid;
use chargen::mif;
use chargen::raster::Rasterizer;
use chargen::table::{self, MissingGlyph};
use chargen::types::{CellSize, CodepointRange, Offset, Pixel};

/// A font whose glyph for `c` lights pixel (x, y) when bit `(x + y * W + c) % 7`
/// of `c` is set. Deterministic, and different for every codepoint.
struct PatternFont;

impl Rasterizer for PatternFont {
    fn rasterize(
        &self,
        codepoint: u32,
        cell: CellSize,
        _offset: Offset,
    ) -> Result<PixelGrid, RenderError> {
        Ok(PixelGrid::from_fn(cell, |x, y| {
            let bit = (x + y * cell.width() + codepoint as usize) % 7;
            if (codepoint >> bit) & 1 != 0 {
                Pixel::Foreground
            } else {
                Pixel::Background
            }
        }))
    }
}

/// Always draws the 2x2 diagonal.
struct DiagonalFont;

impl Rasterizer for DiagonalFont {
    fn rasterize(
        &self,
        _codepoint: u32,
        cell: CellSize,
        _offset: Offset,
    ) -> Result<PixelGrid, RenderError> {
        Ok(PixelGrid::from_fn(cell, |x, y| {
            if x == y {
                Pixel::Foreground
            } else {
                Pixel::Background
            }
        }))
    }
}

fn config(first: u32, last: u32, side: usize) -> GeneratorConfig {
    GeneratorConfig {
        range: CodepointRange::new(first, last),
        cell: CellSize::square(side).unwrap(),
        ..GeneratorConfig::default()
    }
}

fn run(rasterizer: &impl Rasterizer, config: &GeneratorConfig) -> Vec<u8> {
    let table = table::build_table(rasterizer, config).unwrap();
    let mut out = Vec::new();
    mif::write_mif(&table, &mut out).unwrap();
    out
}

#[test]
fn diagonal_2x2_file() {
    let out = run(&DiagonalFont, &config(65, 65, 2));
    let expected = "DEPTH = 1;
WIDTH = 4;
ADDRESS_RADIX = HEX;
DATA_RADIX = HEX;

CONTENT
BEGIN
0 : 9;
END";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn pipeline_is_idempotent() {
    let cfg = config(32, 126, 8);
    let first = run(&PatternFont, &cfg);
    let second = run(&PatternFont, &cfg);
    assert_eq!(first, second);
}

#[test]
fn printable_ascii_table_shape() {
    let out = String::from_utf8(run(&PatternFont, &GeneratorConfig::default())).unwrap();
    assert!(out.starts_with("DEPTH = 95;\nWIDTH = 64;\n"));
    assert!(out.ends_with(";\nEND"));

    let rows: Vec<&str> = out
        .lines()
        .skip_while(|l| *l != "BEGIN")
        .skip(1)
        .take_while(|l| *l != "END")
        .collect();
    assert_eq!(rows.len(), 95);

    let addresses: Vec<usize> = rows
        .iter()
        .map(|r| usize::from_str_radix(r.split(" : ").next().unwrap(), 16).unwrap())
        .collect();
    assert_eq!(addresses, (0..95).collect::<Vec<_>>());
}

#[test]
fn single_and_empty_ranges() {
    let out = String::from_utf8(run(&PatternFont, &config(65, 65, 8))).unwrap();
    let single = mif::parse_mif(&out).unwrap();
    assert_eq!(single.depth, 1);

    let out = String::from_utf8(run(&PatternFont, &config(66, 65, 8))).unwrap();
    assert!(out.starts_with("DEPTH = 0;\n"));
    assert!(out.ends_with("BEGIN\nEND"));
}

#[test]
fn file_decodes_back_to_rasterized_grids() {
    let cfg = config(0x30, 0x5a, 8);
    let path = std::env::temp_dir().join(format!("chargen-pipeline-{}.mif", std::process::id()));

    let table = table::build_table(&PatternFont, &cfg).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    mif::write_mif(&table, file).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let parsed = mif::parse_mif(&text).unwrap();
    assert_eq!(parsed.width, 64);
    assert_eq!(parsed.words.len(), cfg.range.len());

    for (i, codepoint) in cfg.range.iter().enumerate() {
        let expected = PatternFont
            .rasterize(codepoint, cfg.cell, cfg.offset)
            .unwrap();
        assert_eq!(
            bits::decode(parsed.words[i], cfg.cell),
            expected,
            "glyph U+{codepoint:04X} at address {i:x}"
        );
    }
}

#[test]
fn missing_glyph_policy_is_explicit() {
    struct Gappy;
    impl Rasterizer for Gappy {
        fn rasterize(&self, cp: u32, cell: CellSize, o: Offset) -> Result<PixelGrid, RenderError> {
            if cp == 0x42 {
                Err(RenderError::UnsupportedGlyph(cp))
            } else {
                DiagonalFont.rasterize(cp, cell, o)
            }
        }
    }

    let mut cfg = config(0x41, 0x43, 2);
    assert!(matches!(
        table::build_table(&Gappy, &cfg),
        Err(RenderError::UnsupportedGlyph(0x42))
    ));

    cfg.missing_glyph = MissingGlyph::Blank;
    let out = String::from_utf8(run(&Gappy, &cfg)).unwrap();
    assert!(out.contains("BEGIN\n0 : 9;\n1 : 0;\n2 : 9;\nEND"));
}

#[test]
fn unwritable_destination_is_a_write_failure() {
    let table = table::build_table(&DiagonalFont, &config(65, 66, 2)).unwrap();
    let readonly = std::fs::File::open(std::env::current_exe().unwrap()).unwrap();
    let err = mif::write_mif(&table, readonly).unwrap_err();
    assert!(matches!(err, MifError::OutputWriteFailure(_)));
}
