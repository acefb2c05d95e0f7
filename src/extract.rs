//! Whole-source extraction
//!
//! Thin driver over [`Parser`] for the common case of scanning a complete
//! data file into a [`Catalog`]. The returned string is the parser's
//! reconstruction of the input; with [`scan`] nothing is replaced, so it
//! equals the input byte for byte.

use crate::catalog::Catalog;
use crate::parsing::{ParseError, Parser};

/// Scan a whole source text, collecting every message into a catalog
/// without replacing anything.
pub fn scan(source: &str, file: &str) -> Result<(Catalog, String), ParseError> {
    let mut catalog = Catalog::new();
    let mut output = String::new();
    {
        let mut parser = Parser::new(|message| {
            catalog.append(message);
            None
        });
        for (idx, line) in source.split_inclusive('\n').enumerate() {
            output.push_str(&parser.parse_line(line, file, idx + 1)?);
        }
        output.push_str(&parser.flush());
    }
    Ok((catalog, output))
}

/// Like [`scan`], but answers every message with its own primary text, the
/// way a translation run with an all-identity catalog would.
pub fn scan_identity(source: &str, file: &str) -> Result<(Catalog, String), ParseError> {
    let mut catalog = Catalog::new();
    let mut output = String::new();
    {
        let mut parser = Parser::new(|message| {
            catalog.append(message);
            Some(message.primary().to_string())
        });
        for (idx, line) in source.split_inclusive('\n').enumerate() {
            output.push_str(&parser.parse_line(line, file, idx + 1)?);
        }
        output.push_str(&parser.flush());
    }
    Ok((catalog, output))
}
