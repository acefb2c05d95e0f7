//! Translatable-string extraction for Endless Sky data files.
//!
//! The game's data language is line-oriented: each line is a list of
//! (possibly quoted) words, and indentation nests lines into blocks. This
//! crate parses that structure just deeply enough to find every string a
//! player can see, reports each one through a callback with a gettext
//! context and an explanatory comment, and reconstructs the input with any
//! replacements the callback supplies swapped in place. The companion
//! [`Catalog`] collects the reported messages and writes them out as a POT
//! file.
//!
//! Typical extraction:
//!
//! ```text
//! let (catalog, _) = sky_gettext::extract::scan(&source, "data/ships.txt")?;
//! print!("{}", catalog.to_pot_string());
//! ```
//!
//! Translation is the same pass with a callback that answers from a
//! translated catalog instead of `None`; the concatenated return values of
//! [`Parser::parse_line`] and [`Parser::flush`] are the translated file.

pub mod catalog;
pub mod extract;
pub mod filters;
pub mod grammar;
pub mod lexing;
pub mod parsing;

pub use catalog::{Catalog, CatalogEntry, Message, Occurrence};
pub use lexing::{choose_quote, tokenize, Quote, TokenizedLine};
pub use parsing::{ParseError, Parser};
