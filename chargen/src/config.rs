use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::Deserialize;

#[cfg(feature = "serde")]
use crate::error::ConfigError;
use crate::table::MissingGlyph;
use crate::types::{CellSize, CodepointRange, Offset};

/// Font file and the size to rasterize it at.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FontSource {
    pub path: PathBuf,
    pub point_size: f32,
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource {
            path: PathBuf::from("pixeldroidMenuRegular.ttf"),
            point_size: 16.0,
        }
    }
}

/// Everything needed to turn a font into a character table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorConfig {
    pub font: FontSource,
    pub range: CodepointRange,
    pub cell: CellSize,
    pub offset: Offset,
    pub missing_glyph: MissingGlyph,
}

/// Serde-driven configuration matching the TOML format.
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    font: FontSource,
    #[serde(default)]
    missing_glyph: MissingGlyph,
    range: Option<RangeConfig>,
    cell: Option<CellConfig>,
    offset: Option<OffsetConfig>,
}

#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
struct RangeConfig {
    first: u32,
    last: u32,
}

#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
struct CellConfig {
    width: usize,
    height: usize,
}

#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
struct OffsetConfig {
    dx: i32,
    dy: i32,
}

#[cfg(feature = "serde")]
impl GeneratorConfig {
    /// Parse a TOML config. Omitted sections keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<GeneratorConfig, ConfigError> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| ConfigError::Toml(e.to_string()))?;

        let cell = match file.cell {
            Some(c) => CellSize::new(c.width, c.height)?,
            None => CellSize::default(),
        };

        Ok(GeneratorConfig {
            font: file.font,
            range: file
                .range
                .map(|r| CodepointRange::new(r.first, r.last))
                .unwrap_or_default(),
            cell,
            offset: file
                .offset
                .map(|o| Offset::new(o.dx, o.dy))
                .unwrap_or_default(),
            missing_glyph: file.missing_glyph,
        })
    }
}
