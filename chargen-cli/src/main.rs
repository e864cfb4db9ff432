use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;

use chargen::bits;
use chargen::config::GeneratorConfig;
use chargen::mif;
use chargen::raster::{FontRasterizer, Rasterizer};
use chargen::table::{self, MissingGlyph};
use chargen::types::{CellSize, CodepointRange, Offset};

mod logging;
mod render_png;

/// Pixel font to MIF character ROM generator
#[derive(Parser)]
#[command(name = "chargen", version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rasterize the codepoint range and write a MIF file
    Generate {
        #[command(flatten)]
        font: FontArgs,
        /// Output MIF file
        #[arg(short, long, default_value = "chardata.mif")]
        output: PathBuf,
    },
    /// Print one rasterized character and its code word
    Show {
        #[command(flatten)]
        font: FontArgs,
        /// Character, or codepoint as decimal, 0x41 or U+0041
        #[arg(long = "char")]
        character: String,
        /// Also write the glyph as a PNG
        #[arg(long)]
        png: Option<PathBuf>,
        /// Pixels per glyph pixel in the PNG
        #[arg(long, default_value = "10")]
        scale: usize,
    },
    /// Render every glyph of a MIF file as a PNG sheet
    Preview {
        /// MIF file to read
        #[arg(long)]
        mif: PathBuf,
        /// Pixels per glyph pixel
        #[arg(long, default_value = "10")]
        scale: usize,
        /// Spacing between glyphs in glyph pixels
        #[arg(long, default_value = "1")]
        spacing: usize,
        /// Glyphs per row
        #[arg(long, default_value = "16")]
        columns: usize,
        /// Output PNG file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },
    /// Regenerate the table and compare it with an existing MIF file
    Verify {
        #[command(flatten)]
        font: FontArgs,
        /// MIF file to check
        #[arg(long)]
        mif: PathBuf,
    },
}

/// Font and table settings. Flags override the config file.
#[derive(Args)]
struct FontArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Font file (TTF/OTF)
    #[arg(long)]
    font: Option<PathBuf>,
    /// Font size in pixels
    #[arg(long)]
    point_size: Option<f32>,
    /// First codepoint of the range (inclusive)
    #[arg(long, value_parser = parse_codepoint)]
    first: Option<u32>,
    /// Last codepoint of the range (inclusive)
    #[arg(long, value_parser = parse_codepoint)]
    last: Option<u32>,
    /// Cell side length in pixels (cells are square)
    #[arg(long)]
    cell: Option<usize>,
    /// Horizontal drawing offset
    #[arg(long, allow_negative_numbers = true)]
    dx: Option<i32>,
    /// Vertical drawing offset
    #[arg(long, allow_negative_numbers = true)]
    dy: Option<i32>,
    /// What to do with codepoints the font has no glyph for: abort or blank
    #[arg(long)]
    missing_glyph: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Command::Generate { font, output } => cmd_generate(&font, &output),
        Command::Show {
            font,
            character,
            png,
            scale,
        } => cmd_show(&font, &character, png.as_deref(), scale),
        Command::Preview {
            mif,
            scale,
            spacing,
            columns,
            output,
        } => cmd_preview(&mif, scale, spacing, columns, &output),
        Command::Verify { font, mif } => cmd_verify(&font, &mif),
    }
}

/// Parse a codepoint given as decimal, `0x41` or `U+0041`.
fn parse_codepoint(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix("U+"))
        .or_else(|| s.strip_prefix("u+"))
    {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("invalid codepoint '{}'", s))
}

/// A single character stands for itself; anything longer is a codepoint.
fn parse_character(s: &str) -> Result<u32> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => parse_codepoint(s).map_err(anyhow::Error::msg),
    }
}

/// Build the configuration: defaults, then the config file, then flags.
fn resolve_config(args: &FontArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let toml_str = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GeneratorConfig::from_toml(&toml_str)
                .with_context(|| format!("parsing config from {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(font) = &args.font {
        config.font.path = font.clone();
    }
    if let Some(size) = args.point_size {
        config.font.point_size = size;
    }
    config.range = CodepointRange::new(
        args.first.unwrap_or(config.range.first),
        args.last.unwrap_or(config.range.last),
    );
    if let Some(side) = args.cell {
        config.cell = CellSize::square(side).context("invalid --cell")?;
    }
    config.offset = Offset::new(
        args.dx.unwrap_or(config.offset.dx),
        args.dy.unwrap_or(config.offset.dy),
    );
    if let Some(policy) = &args.missing_glyph {
        config.missing_glyph = match policy.as_str() {
            "abort" => MissingGlyph::Abort,
            "blank" => MissingGlyph::Blank,
            _ => anyhow::bail!("unknown missing-glyph policy '{}', use 'abort' or 'blank'", policy),
        };
    }

    Ok(config)
}

fn load_font(config: &GeneratorConfig) -> Result<FontRasterizer> {
    info!(
        "loading {} at {}px",
        config.font.path.display(),
        config.font.point_size
    );
    FontRasterizer::open(&config.font.path, config.font.point_size)
        .with_context(|| format!("loading font {}", config.font.path.display()))
}

fn cmd_generate(args: &FontArgs, output: &Path) -> Result<()> {
    let config = resolve_config(args)?;
    let font = load_font(&config)?;
    let table = table::build_table(&font, &config).context("building character table")?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    if let Err(e) = mif::write_mif(&table, file) {
        // A truncated table must not be mistaken for a valid one
        let _ = std::fs::remove_file(output);
        return Err(e).with_context(|| format!("writing {}", output.display()));
    }

    println!(
        "wrote {} ({} entries, {} bits each)",
        output.display(),
        table.depth(),
        table.width()
    );
    Ok(())
}

fn cmd_show(args: &FontArgs, character: &str, png: Option<&Path>, scale: usize) -> Result<()> {
    let config = resolve_config(args)?;
    let codepoint = parse_character(character)?;
    let font = load_font(&config)?;

    let grid = font
        .rasterize(codepoint, config.cell, config.offset)
        .with_context(|| format!("rasterizing U+{:04X}", codepoint))?;
    let word = bits::encode(&grid);

    println!(
        "U+{:04X} {:?}  cell {}x{}  offset ({}, {})",
        codepoint,
        char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER),
        config.cell.width(),
        config.cell.height(),
        config.offset.dx,
        config.offset.dy,
    );
    for line in grid.to_text().lines() {
        println!("  {}", line);
    }
    println!("word: {:x}", word);

    if let Some(path) = png {
        render_png::write_glyph_png(&grid, scale, 1, path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn read_mif(path: &Path) -> Result<mif::MifTable> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    mif::parse_mif(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Recover the square cell from a MIF `WIDTH`.
fn cell_for_width(width: usize) -> Result<CellSize> {
    let side = (width as f64).sqrt().round() as usize;
    anyhow::ensure!(
        side.checked_mul(side) == Some(width),
        "WIDTH {} is not a square cell size",
        width
    );
    Ok(CellSize::square(side)?)
}

fn cmd_preview(
    path: &Path,
    scale: usize,
    spacing: usize,
    columns: usize,
    output: &Path,
) -> Result<()> {
    let table = read_mif(path)?;
    let cell = cell_for_width(table.width)?;
    let grids: Vec<_> = table
        .words
        .iter()
        .map(|&word| bits::decode(word, cell))
        .collect();

    render_png::write_sheet_png(&grids, scale, spacing, columns, output)?;
    println!("wrote {} ({} glyphs)", output.display(), grids.len());
    Ok(())
}

fn cmd_verify(args: &FontArgs, path: &Path) -> Result<()> {
    let existing = read_mif(path)?;
    let config = resolve_config(args)?;
    let font = load_font(&config)?;
    let table = table::build_table(&font, &config).context("building character table")?;

    anyhow::ensure!(
        existing.width == table.width(),
        "FAIL: {} has WIDTH {}, regenerated table has {}",
        path.display(),
        existing.width,
        table.width()
    );

    if existing.words == table.words() {
        println!(
            "PASS: {}: regenerated {} entries match",
            path.display(),
            table.depth()
        );
        return Ok(());
    }

    // Find first mismatch for diagnostics
    let mut msg = format!(
        "FAIL: {} differs from the regenerated table\n  expected {} entries, got {}",
        path.display(),
        existing.depth,
        table.depth()
    );
    for (i, (expected, got)) in existing.words.iter().zip(table.words()).enumerate() {
        if expected != got {
            let codepoint = config.range.first + i as u32;
            msg.push_str(&format!(
                "\n  first mismatch at address {:x} (U+{:04X}): expected {:x}, got {:x}",
                i, codepoint, expected, got
            ));
            break;
        }
    }
    anyhow::bail!(msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> FontArgs {
        FontArgs {
            config: None,
            font: None,
            point_size: None,
            first: None,
            last: None,
            cell: None,
            dx: None,
            dy: None,
            missing_glyph: None,
        }
    }

    #[test]
    fn codepoint_formats() {
        assert_eq!(parse_codepoint("65"), Ok(65));
        assert_eq!(parse_codepoint("0x41"), Ok(65));
        assert_eq!(parse_codepoint("U+0041"), Ok(65));
        assert!(parse_codepoint("A1").is_err());
    }

    #[test]
    fn character_or_codepoint() {
        assert_eq!(parse_character("A").unwrap(), 65);
        assert_eq!(parse_character("7").unwrap(), '7' as u32);
        assert_eq!(parse_character("0x7e").unwrap(), 126);
        assert!(parse_character("abc").is_err());
    }

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(resolve_config(&no_overrides()).unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = FontArgs {
            first: Some(0x41),
            last: Some(0x5a),
            cell: Some(10),
            dy: Some(-2),
            missing_glyph: Some("blank".into()),
            ..no_overrides()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.range, CodepointRange::new(65, 90));
        assert_eq!(config.cell.bits(), 100);
        assert_eq!(config.offset, Offset::new(-1, -2));
        assert_eq!(config.missing_glyph, MissingGlyph::Blank);
    }

    #[test]
    fn bad_policy_is_rejected() {
        let args = FontArgs {
            missing_glyph: Some("skip".into()),
            ..no_overrides()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn width_to_cell() {
        assert_eq!(cell_for_width(64).unwrap(), CellSize::default());
        assert!(cell_for_width(32).is_err());
    }

    #[test]
    fn huge_width_is_an_error() {
        // sqrt rounds to 2^32, whose square does not fit in usize
        assert!(cell_for_width(usize::MAX).is_err());
        // square, but wider than a code word
        assert!(cell_for_width(144).is_err());
    }

    #[test]
    fn cli_parses_negative_offsets() {
        let cli = Cli::try_parse_from([
            "chargen", "generate", "--dx", "-2", "--dy", "-5", "--first", "0x20", "-o", "out.mif",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { font, output } => {
                assert_eq!(font.dx, Some(-2));
                assert_eq!(font.dy, Some(-5));
                assert_eq!(font.first, Some(32));
                assert_eq!(output, PathBuf::from("out.mif"));
            }
            _ => panic!("expected generate"),
        }
    }
}
