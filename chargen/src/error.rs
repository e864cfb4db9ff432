use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellError {
    #[error("cell size {0}x{1} has a zero side")]
    Empty(usize, usize),

    #[error("cell size {0}x{1} is not square")]
    NotSquare(usize, usize),

    #[error("cell size {width}x{height} needs {bits} bits, more than a 128-bit code word")]
    TooManyBits {
        width: usize,
        height: usize,
        bits: usize,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font rendering unavailable: {0}")]
    RenderingUnavailable(String),

    #[error("font has no glyph for codepoint U+{0:04X}")]
    UnsupportedGlyph(u32),

    #[error("glyph for U+{codepoint:04X} is {got_width}x{got_height}, cell is {width}x{height}")]
    WrongSize {
        codepoint: u32,
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },
}

#[derive(Debug, Error)]
pub enum MifError {
    #[error("failed to write MIF output: {0}")]
    OutputWriteFailure(#[from] std::io::Error),

    #[error("MIF line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Toml(String),

    #[error("invalid cell: {0}")]
    Cell(#[from] CellError),
}
