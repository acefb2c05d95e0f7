//! Gettext message catalog
//!
//! Collects every translatable string the parser reports, deduplicates by
//! (text, context) identity, merges singular/plural variants, and writes the
//! result out as a POT catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;

/// One translatable string reported by the parser, together with its
/// disambiguating context and provenance.
///
/// `text` holds one element, or two when a singular/plural pair was
/// extracted (singular first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: Vec<String>,
    pub context: String,
    pub comment: String,
    pub file: String,
    pub line: usize,
}

impl Message {
    pub fn singular(
        text: impl Into<String>,
        context: impl Into<String>,
        comment: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Message {
            text: vec![text.into()],
            context: context.into(),
            comment: comment.into(),
            file: file.into(),
            line,
        }
    }

    pub fn with_plural(
        singular: impl Into<String>,
        plural: impl Into<String>,
        context: impl Into<String>,
        comment: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Message {
            text: vec![singular.into(), plural.into()],
            context: context.into(),
            comment: comment.into(),
            file: file.into(),
            line,
        }
    }

    /// The msgid text.
    pub fn primary(&self) -> &str {
        self.text.first().map(String::as_str).unwrap_or("")
    }
}

/// Where (and why) one occurrence of a catalog entry was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub comment: String,
    pub file: String,
    pub line: usize,
}

/// One unique (text, context) entry with all of its occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub text: Vec<String>,
    pub context: String,
    pub occurrences: Vec<Occurrence>,
}

/// The POT catalog: an append-only, insertion-ordered map keyed by
/// (primary text, context).
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Record a message. Messages with an empty primary text are dropped. A
    /// repeat of a known (text, context) pair appends an occurrence; if the
    /// repeat carries a plural form the stored entry lacked, the stored text
    /// is upgraded in place.
    pub fn append(&mut self, message: &Message) {
        let primary = message.primary();
        if primary.is_empty() {
            return;
        }
        let key = entry_key(primary, &message.context);
        let occurrence = Occurrence {
            comment: message.comment.clone(),
            file: message.file.clone(),
            line: message.line,
        };
        match self.index.get(&key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.occurrences.push(occurrence);
                if entry.text.len() < message.text.len() {
                    entry.text = message.text.clone();
                }
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(CatalogEntry {
                    text: message.text.clone(),
                    context: message.context.clone(),
                    occurrences: vec![occurrence],
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by its primary text and context.
    pub fn get(&self, text: &str, context: &str) -> Option<&CatalogEntry> {
        self.index
            .get(&entry_key(text, context))
            .map(|&idx| &self.entries[idx])
    }

    /// Serialize the catalog in POT format.
    pub fn write<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(w)?;
            for occ in &entry.occurrences {
                if !occ.comment.is_empty() {
                    writeln!(w, "#. {}", occ.comment)?;
                }
            }
            write!(w, "#:")?;
            for occ in &entry.occurrences {
                write!(w, " {}:{}", occ.file, occ.line)?;
            }
            writeln!(w)?;
            if !entry.context.is_empty() {
                writeln!(w, "msgctxt \"{}\"", escape(&entry.context))?;
            }
            let singular = entry.text.first().map(String::as_str).unwrap_or("");
            writeln!(w, "msgid \"{}\"", escape(singular))?;
            if let Some(plural) = entry.text.get(1) {
                writeln!(w, "msgid_plural \"{}\"", escape(plural))?;
                writeln!(w, "msgstr[0] \"\"")?;
            } else {
                writeln!(w, "msgstr \"\"")?;
            }
        }
        Ok(())
    }

    /// Convenience wrapper returning the POT text as a string.
    pub fn to_pot_string(&self) -> String {
        let mut buf = Vec::new();
        // writing to a Vec cannot fail
        let _ = self.write(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn entry_key(text: &str, context: &str) -> String {
    if context.is_empty() {
        text.to_string()
    } else {
        // EOT separator, the same convention gettext itself uses
        format!("{}\u{4}{}", context, text)
    }
}

/// Escape a string for a PO literal. Control characters use their named
/// escapes where gettext defines one, `\xHH` otherwise; an embedded newline
/// closes the literal and reopens it on the next line.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut found_newline = false;
    for c in s.chars() {
        match c {
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => {
                found_newline = true;
                out.push_str("\\n\"\n\"");
            }
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c < ' ' => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if s.ends_with('\n') {
        // drop the dangling continuation opener after a trailing newline
        out.truncate(out.len() - 3);
    }
    if found_newline {
        format!("\"\n\"{}", out)
    } else {
        out
    }
}
