//! Memory Initialization File (MIF) output.
//!
//! ```text
//! DEPTH = 95;
//! WIDTH = 64;
//! ADDRESS_RADIX = HEX;
//! DATA_RADIX = HEX;
//!
//! CONTENT
//! BEGIN
//! 0 : 0;
//! 1 : 5f000000;
//! ...
//! END
//! ```
//!
//! Addresses and values are lowercase hex without padding. There is no
//! newline after `END`.

use std::io::Write;

use crate::error::MifError;
use crate::table::CharacterTable;
use crate::types::CodeWord;

/// Render a table as MIF text.
pub fn serialize(table: &CharacterTable) -> String {
    // "a : 0123456789abcdef;\n" is about 24 bytes for an 8x8 font
    let mut out = String::with_capacity(96 + table.len() * 24);

    out.push_str(&format!("DEPTH = {};\n", table.depth()));
    out.push_str(&format!("WIDTH = {};\n", table.width()));
    out.push_str("ADDRESS_RADIX = HEX;\n");
    out.push_str("DATA_RADIX = HEX;\n\n");
    out.push_str("CONTENT\n");
    out.push_str("BEGIN\n");
    for (address, word) in table.words().iter().enumerate() {
        out.push_str(&format!("{:x} : {:x};\n", address, word));
    }
    out.push_str("END");

    out
}

/// Serialize the whole table and hand it to `writer` in a single write.
///
/// A failed write is returned as-is; whatever reached the sink is not a
/// valid file.
pub fn write_mif<W: Write>(table: &CharacterTable, mut writer: W) -> Result<(), MifError> {
    let text = serialize(table);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// A MIF file read back into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MifTable {
    pub depth: usize,
    pub width: usize,
    /// Words in address order.
    pub words: Vec<CodeWord>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Content,
    Begin,
    Done,
}

/// Parse MIF text in the format written by [`serialize`].
///
/// Whitespace around tokens and blank lines are accepted; everything else
/// (radix, address order, row count, value width) is checked.
pub fn parse_mif(text: &str) -> Result<MifTable, MifError> {
    let mut depth: Option<usize> = None;
    let mut width: Option<usize> = None;
    let mut address_radix = false;
    let mut data_radix = false;
    let mut words: Vec<CodeWord> = Vec::new();
    let mut section = Section::Header;
    let mut last_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let err = |message: String| MifError::Parse {
            line: line_no,
            message,
        };

        match section {
            Section::Header => {
                if line == "CONTENT" {
                    section = Section::Content;
                    continue;
                }
                let (key, value) = header_assignment(line).ok_or_else(|| {
                    err(format!("expected 'KEY = VALUE;' or CONTENT, found '{}'", line))
                })?;
                match key {
                    "DEPTH" => {
                        let n = value
                            .parse()
                            .map_err(|_| err(format!("invalid DEPTH '{}'", value)))?;
                        depth = Some(n);
                    }
                    "WIDTH" => {
                        let n = value
                            .parse()
                            .map_err(|_| err(format!("invalid WIDTH '{}'", value)))?;
                        if n == 0 || n > CodeWord::BITS as usize {
                            return Err(err(format!(
                                "WIDTH {} outside 1..={}",
                                n,
                                CodeWord::BITS
                            )));
                        }
                        width = Some(n);
                    }
                    "ADDRESS_RADIX" | "DATA_RADIX" => {
                        if value != "HEX" {
                            return Err(err(format!("unsupported {} '{}', only HEX", key, value)));
                        }
                        if key == "ADDRESS_RADIX" {
                            address_radix = true;
                        } else {
                            data_radix = true;
                        }
                    }
                    _ => return Err(err(format!("unknown header '{}'", key))),
                }
            }
            Section::Content => {
                if line != "BEGIN" {
                    return Err(err(format!("expected BEGIN, found '{}'", line)));
                }
                section = Section::Begin;
            }
            Section::Begin => {
                if line == "END" || line == "END;" {
                    section = Section::Done;
                    continue;
                }
                let (address, value) = content_row(line)
                    .ok_or_else(|| err(format!("expected 'ADDR : VALUE;', found '{}'", line)))?;
                let address = usize::from_str_radix(address, 16)
                    .map_err(|_| err(format!("invalid address '{}'", address)))?;
                if address != words.len() {
                    return Err(err(format!(
                        "address {:x} out of order, expected {:x}",
                        address,
                        words.len()
                    )));
                }
                let word = CodeWord::from_str_radix(value, 16)
                    .map_err(|_| err(format!("invalid value '{}'", value)))?;
                if let Some(w) = width {
                    if w < CodeWord::BITS as usize && word >> w != 0 {
                        return Err(err(format!("value {:x} wider than {} bits", word, w)));
                    }
                }
                words.push(word);
            }
            Section::Done => {
                return Err(err(format!("unexpected '{}' after END", line)));
            }
        }
    }

    let eof = |message: &str| MifError::Parse {
        line: last_line,
        message: message.to_string(),
    };
    if section != Section::Done {
        return Err(eof("missing END"));
    }
    let depth = depth.ok_or_else(|| eof("missing DEPTH"))?;
    let width = width.ok_or_else(|| eof("missing WIDTH"))?;
    if !address_radix || !data_radix {
        return Err(eof("missing ADDRESS_RADIX or DATA_RADIX"));
    }
    if words.len() != depth {
        return Err(MifError::Parse {
            line: last_line,
            message: format!("DEPTH is {} but {} rows were given", depth, words.len()),
        });
    }

    Ok(MifTable {
        depth,
        width,
        words,
    })
}

/// Split `KEY = VALUE;` into its trimmed parts.
fn header_assignment(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_suffix(';')?;
    let (key, value) = body.split_once('=')?;
    Some((key.trim(), value.trim()))
}

/// Split `ADDR : VALUE;` into its trimmed parts.
fn content_row(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_suffix(';')?;
    let (address, value) = body.split_once(':')?;
    Some((address.trim(), value.trim()))
}
