//! Base tokenization for Endless Sky data lines
//!
//! This module performs the raw tokenization of one input line using the
//! logos lexer library. A line is split into words, the quotation mark used
//! for each word, and the literal delimiter text around the words. Nothing
//! is discarded: concatenating the delimiters and re-quoted words yields the
//! original line byte for byte, which is what allows the parser to hand a
//! reconstructed line back to the caller with only translated words swapped
//! in place.
//!
//! Quoting rules of the data format:
//! - a word may be wrapped in `"` or a backtick; the quote only changes
//!   which character terminates the word
//! - an unquoted word runs to the next whitespace character, so quotes and
//!   `#` are ordinary characters once a bare word has started
//! - a `#` between tokens starts a comment that swallows the rest of the
//!   line (newline included) as delimiter text
//! - an unterminated quote runs to the end of the line

use logos::Logos;
use serde::{Deserialize, Serialize};

/// Raw token classes for one line. Every byte of the line is covered by
/// exactly one of these, so reconstruction loses nothing.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum RawToken {
    // Double-quoted word; the closing quote is optional at end of line
    #[regex(r#""[^"]*"?"#)]
    DoubleQuoted,

    // Backtick-quoted word; the closing backtick is optional at end of line
    #[regex(r"`[^`]*`?")]
    BacktickQuoted,

    // Comment between tokens, consuming the rest of the line
    #[regex(r"#[^\n]*\n?")]
    Comment,

    // Run of whitespace; every character up to and including space counts
    #[regex(r"[\x00-\x20]+")]
    Whitespace,

    // Bare word: cannot start with whitespace, a quote, or '#', but only
    // whitespace terminates it
    #[regex(r##"[^\x00-\x20"`#][^\x00-\x20]*"##)]
    Word,
}

/// The quotation mark wrapped around a word, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quote {
    None,
    Double,
    Backtick,
}

impl Quote {
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::None => "",
            Quote::Double => "\"",
            Quote::Backtick => "`",
        }
    }
}

/// One tokenized line.
///
/// Invariant: `quotes.len()` and `closed.len()` equal `words.len()`, and
/// `delims.len()` is `words.len() + 1` (leading delimiter always present,
/// even when empty) unless the line ends exactly at the last word, in which
/// case the empty trailing delimiter is dropped and
/// `delims.len() == words.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizedLine {
    pub words: Vec<String>,
    pub quotes: Vec<Quote>,
    /// Whether the word's closing quote was actually present; false for a
    /// quote left unterminated at end of line. Always true for bare words.
    pub closed: Vec<bool>,
    pub delims: Vec<String>,
    /// Number of leading whitespace characters.
    pub indent: usize,
}

impl TokenizedLine {
    /// Rebuild the line from delimiters and re-quoted words.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if let Some(delim) = self.delims.get(i) {
                out.push_str(delim);
            }
            let q = self.quotes.get(i).copied().unwrap_or(Quote::None).as_str();
            out.push_str(q);
            out.push_str(word);
            if self.closed.get(i).copied().unwrap_or(true) {
                out.push_str(q);
            }
        }
        if self.delims.len() > self.words.len() {
            if let Some(delim) = self.delims.last() {
                out.push_str(delim);
            }
        }
        out
    }
}

/// Tokenize one line. The line must not contain `\n` except as its final
/// character.
pub fn tokenize(line: &str) -> TokenizedLine {
    let mut words: Vec<String> = Vec::new();
    let mut quotes: Vec<Quote> = Vec::new();
    let mut closed: Vec<bool> = Vec::new();
    let mut delims: Vec<String> = vec![String::new()];
    let mut indent = 0;
    let mut first = true;

    let mut lexer = RawToken::lexer(line);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        match result {
            Ok(RawToken::Whitespace) => {
                if first {
                    // the terminating newline of a blank line is not indent
                    indent = slice.chars().filter(|&c| c != '\n').count();
                }
                push_delim(&mut delims, slice);
            }
            Ok(RawToken::Comment) => push_delim(&mut delims, slice),
            Ok(RawToken::DoubleQuoted) => {
                words.push(strip_quote(slice, '"'));
                quotes.push(Quote::Double);
                closed.push(slice.len() >= 2 && slice.ends_with('"'));
                delims.push(String::new());
            }
            Ok(RawToken::BacktickQuoted) => {
                words.push(strip_quote(slice, '`'));
                quotes.push(Quote::Backtick);
                closed.push(slice.len() >= 2 && slice.ends_with('`'));
                delims.push(String::new());
            }
            Ok(RawToken::Word) => {
                words.push(slice.to_string());
                quotes.push(Quote::None);
                closed.push(true);
                delims.push(String::new());
            }
            // Unreachable: the token classes cover every character. Folding
            // the slice into the open delimiter keeps reconstruction exact.
            Err(()) => push_delim(&mut delims, slice),
        }
        first = false;
    }

    if delims.last().map_or(false, |d| d.is_empty()) {
        delims.pop();
    }

    TokenizedLine {
        words,
        quotes,
        closed,
        delims,
        indent,
    }
}

/// Pick the quotation mark a word needs when written back out. This must be
/// the exact algorithm the game's own data writer uses: a literal `"` forces
/// a backtick, whitespace or an empty word forces `"`, anything else is left
/// bare.
pub fn choose_quote(text: &str) -> Quote {
    let mut has_space = false;
    let mut has_quote = false;
    for c in text.chars() {
        if c <= ' ' {
            has_space = true;
        }
        if c == '"' {
            has_quote = true;
        }
    }
    if has_quote {
        Quote::Backtick
    } else if has_space || text.is_empty() {
        Quote::Double
    } else {
        Quote::None
    }
}

fn push_delim(delims: &mut Vec<String>, slice: &str) {
    if let Some(d) = delims.last_mut() {
        d.push_str(slice);
    }
}

fn strip_quote(slice: &str, quote: char) -> String {
    let inner = &slice[quote.len_utf8()..];
    inner.strip_suffix(quote).unwrap_or(inner).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn splits_words_and_counts_indent() {
        let line = tokenize("\toutfit \"Blaster Turret\"\n");
        assert_eq!(line.words, vec!["outfit", "Blaster Turret"]);
        assert_eq!(line.quotes, vec![Quote::None, Quote::Double]);
        assert_eq!(line.indent, 1);
        assert_eq!(line.delims, vec!["\t", " ", "\n"]);
    }

    #[test]
    fn empty_line_has_no_delimiters() {
        let line = tokenize("");
        assert!(line.words.is_empty());
        assert!(line.delims.is_empty());
        assert_eq!(line.indent, 0);
    }

    #[test]
    fn blank_line_keeps_whitespace_as_delimiter() {
        let line = tokenize("  \n");
        assert!(line.words.is_empty());
        assert_eq!(line.delims, vec!["  \n"]);
        assert_eq!(line.indent, 2);
    }

    #[test]
    fn comment_is_delimiter_text() {
        let line = tokenize("name Foo # trailing comment\n");
        assert_eq!(line.words, vec!["name", "Foo"]);
        assert_eq!(line.delims, vec!["", " ", " # trailing comment\n"]);
    }

    #[test]
    fn hash_inside_word_is_not_a_comment() {
        let line = tokenize("a#b c\n");
        assert_eq!(line.words, vec!["a#b", "c"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let line = tokenize("name \"unterminated\n");
        assert_eq!(line.words, vec!["name", "unterminated\n"]);
        assert_eq!(line.quotes, vec![Quote::None, Quote::Double]);
        assert_eq!(line.closed, vec![true, false]);
        // the newline was swallowed by the word, so no trailing delimiter
        assert_eq!(line.delims.len(), line.words.len());
    }

    #[test]
    fn unterminated_quote_reconstructs_without_a_phantom_close() {
        assert_eq!(tokenize("name \"open\n").reconstruct(), "name \"open\n");
        // a lone opening quote is an empty unterminated word
        let line = tokenize("\"");
        assert_eq!(line.words, vec![""]);
        assert_eq!(line.closed, vec![false]);
        assert_eq!(line.reconstruct(), "\"");
    }

    #[test]
    fn backtick_word_may_contain_double_quotes() {
        let line = tokenize("say `a \"quoted\" thing`\n");
        assert_eq!(line.words, vec!["say", "a \"quoted\" thing"]);
        assert_eq!(line.quotes, vec![Quote::None, Quote::Backtick]);
    }

    #[rstest]
    #[case("word", Quote::None)]
    #[case("two words", Quote::Double)]
    #[case("", Quote::Double)]
    #[case("tab\there", Quote::Double)]
    #[case("a \"quote\"", Quote::Backtick)]
    fn quote_choice(#[case] text: &str, #[case] expected: Quote) {
        assert_eq!(choose_quote(text), expected);
    }

    #[rstest]
    #[case("outfit \"Blaster\"\n")]
    #[case("\tcategory \"Guns\"\n")]
    #[case("\t\"mass\" 5\n")]
    #[case("   leading   spaces\t mixed\n")]
    #[case("# a whole-line comment\n")]
    #[case("word`tick and\"quote inside\n")]
    #[case("trailing-no-newline")]
    #[case("\n")]
    #[case("a\t`")]
    #[case("a\t`\n")]
    #[case("say \"half finished\n")]
    fn round_trips_byte_for_byte(#[case] line: &str) {
        assert_eq!(tokenize(line).reconstruct(), line);
    }

    #[test]
    fn tokens_serialize() {
        let line = tokenize("outfit \"Blaster\"\n");
        let json = serde_json::to_string(&line).expect("serializes");
        let back: TokenizedLine = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, line);
    }
}
