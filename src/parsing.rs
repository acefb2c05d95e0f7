//! Line-by-line parser driver
//!
//! The parser consumes one line at a time and reports every translatable
//! word through a caller-supplied callback. The callback may answer with a
//! replacement text, in which case the returned line has the word swapped
//! in place and re-quoted; answering `None` leaves the line untouched. The
//! concatenation of all returned strings plus the final [`Parser::flush`]
//! output reproduces the input exactly when nothing is replaced.
//!
//! Block structure is tracked with an explicit stack of indentation frames.
//! A frame's depth is unknown until its first child line arrives, because
//! the data format allows any deeper indentation to open a block. Frames
//! whose opening line matched no grammar node carry no table; everything
//! inside them is passed through untouched, and indentation drift among
//! their children is tolerated until a line dedents back to a recognized
//! frame. Inside a recognized block, a line whose indentation matches no
//! open frame is an error.

use crate::catalog::Message;
use crate::filters::SemanticFilter;
use crate::grammar::{TableRef, TOP_LEVEL};
use crate::lexing::{choose_quote, tokenize, TokenizedLine};
use std::error::Error;
use std::fmt;

/// Receives every extracted message; a `Some` return replaces the word.
pub type LineCallback<'a> = Box<dyn FnMut(&Message) -> Option<String> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line inside a recognized block sits at an indentation depth that
    /// aligns with no open frame.
    IndentMismatch {
        file: String,
        line: usize,
        indent: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IndentMismatch { file, line, indent } => write!(
                f,
                "{}:{}: indentation depth {} does not align with any open block",
                file, line, indent
            ),
        }
    }
}

impl Error for ParseError {}

/// One open block.
struct Frame {
    /// `None` until the first child line fixes the depth.
    depth: Option<usize>,
    /// `None` for unrecognized blocks; their content is ignored.
    table: Option<TableRef>,
    context: String,
    comment: String,
    filter: Option<Box<dyn SemanticFilter>>,
}

/// The frame stack. The root frame is pinned at depth 0 with the top-level
/// table and is never popped.
struct IndentTracker {
    frames: Vec<Frame>,
}

impl IndentTracker {
    fn new() -> Self {
        IndentTracker {
            frames: vec![Frame {
                depth: Some(0),
                table: Some(&TOP_LEVEL),
                context: String::new(),
                comment: String::new(),
                filter: None,
            }],
        }
    }

    /// Align the stack with a line at `depth`. Pops frames the line has
    /// dedented out of, handing their filters back for flushing in
    /// innermost-first order. Returns false if the depth aligns with no
    /// frame and the surviving frame is a recognized block.
    fn align(&mut self, depth: usize, popped: &mut Vec<Box<dyn SemanticFilter>>) -> bool {
        let n = self.frames.len();
        if n >= 2 && self.frames[n - 1].depth.is_none() {
            // the newest frame takes the depth of its first child line,
            // provided the line is deeper than the enclosing frame
            if self.frames[n - 2].depth.map_or(false, |d| d < depth) {
                self.frames[n - 1].depth = Some(depth);
                return true;
            }
        }
        loop {
            let pop = self
                .frames
                .last()
                .map_or(false, |f| f.depth.map_or(true, |d| d > depth));
            if !pop {
                break;
            }
            if let Some(frame) = self.frames.pop() {
                if let Some(filter) = frame.filter {
                    popped.push(filter);
                }
            }
        }
        self.frames
            .last()
            .map_or(true, |f| f.depth == Some(depth) || f.table.is_none())
    }

    fn top(&self) -> &Frame {
        // the root frame is never popped
        self.frames.last().unwrap_or_else(|| unreachable!())
    }

    fn top_filter_mut(&mut self) -> Option<&mut Box<dyn SemanticFilter>> {
        self.frames.last_mut().and_then(|f| f.filter.as_mut())
    }

    fn push(
        &mut self,
        table: Option<TableRef>,
        context: String,
        comment: String,
        filter: Option<Box<dyn SemanticFilter>>,
    ) {
        self.frames.push(Frame {
            depth: None,
            table,
            context,
            comment,
            filter,
        });
    }
}

/// Accumulator for an opaque text block (`phrase` bodies, news names and
/// messages). The whole block, opening line included, becomes one message;
/// interior lines keep their indentation relative to the block's base.
struct HereText {
    base_indent: usize,
    text: String,
    context: String,
    comment: String,
    file: String,
    line: usize,
}

impl HereText {
    fn new(
        base_indent: usize,
        words: &[String],
        context: String,
        comment: String,
        file: &str,
        line: usize,
    ) -> Self {
        let mut block = HereText {
            base_indent,
            text: String::new(),
            context,
            comment,
            file: file.to_string(),
            line,
        };
        block.append(base_indent, words);
        block
    }

    fn append(&mut self, indent: usize, words: &[String]) {
        // quoted words starting with '#' are commented-out content
        if words.first().map_or(false, |w| w.starts_with('#')) {
            return;
        }
        for _ in 0..indent.saturating_sub(self.base_indent) {
            self.text.push('\t');
        }
        let mut sep = "";
        for word in words {
            self.text.push_str(sep);
            let quote = choose_quote(word).as_str();
            self.text.push_str(quote);
            self.text.push_str(word);
            self.text.push_str(quote);
            sep = " ";
        }
        self.text.push('\n');
    }
}

/// Emit a finished text block through the callback and lay the result out
/// at the block's base indentation. An unreplaced block keeps its stored
/// relative layout; a replacement gets its first line at the base and any
/// continuation lines one tab deeper.
fn finish_here_text(block: HereText, callback: &mut (dyn FnMut(&Message) -> Option<String> + '_)) -> String {
    let message = Message::singular(
        block.text.clone(),
        block.context,
        block.comment,
        block.file,
        block.line,
    );
    let replacement = callback(&message);
    let base = "\t".repeat(block.base_indent);
    let mut out = String::new();
    match replacement {
        None => {
            for line in block.text.lines() {
                out.push_str(&base);
                out.push_str(line);
                out.push('\n');
            }
        }
        Some(replacement) => {
            for (i, line) in replacement.lines().enumerate() {
                out.push_str(&base);
                if i > 0 {
                    out.push('\t');
                }
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

pub struct Parser<'a> {
    callback: LineCallback<'a>,
    tracker: IndentTracker,
    here_text: Option<HereText>,
    /// Blank lines seen while a text block is open; replayed after the
    /// block if it turns out to have ended before them.
    remainder: String,
}

impl<'a> Parser<'a> {
    pub fn new(callback: impl FnMut(&Message) -> Option<String> + 'a) -> Self {
        Parser {
            callback: Box::new(callback),
            tracker: IndentTracker::new(),
            here_text: None,
            remainder: String::new(),
        }
    }

    /// Parse one line and return its reconstruction (with any replacements
    /// applied), possibly preceded by the layout of a text block this line
    /// just closed. The line must contain no `\n` except as its final
    /// character.
    pub fn parse_line(&mut self, line: &str, file: &str, line_number: usize) -> Result<String, ParseError> {
        let Self {
            callback,
            tracker,
            here_text,
            remainder,
        } = self;
        let TokenizedLine {
            mut words,
            mut quotes,
            mut closed,
            delims,
            indent,
        } = tokenize(line);

        let mut prefix = String::new();
        if here_text.is_some() {
            if words.is_empty() {
                remainder.push_str(line);
                return Ok(String::new());
            }
            if here_text.as_ref().map_or(false, |b| b.base_indent < indent) {
                if let Some(block) = here_text.as_mut() {
                    block.append(indent, &words);
                }
                remainder.clear();
                return Ok(String::new());
            }
            if let Some(block) = here_text.take() {
                prefix = finish_here_text(block, &mut **callback);
                prefix.push_str(remainder);
                remainder.clear();
            }
        }
        if words.is_empty() {
            return Ok(prefix + line);
        }

        let mut popped = Vec::new();
        let aligned = tracker.align(indent, &mut popped);
        for mut filter in popped {
            filter.flush(&mut |message: Message| {
                let _ = (callback)(&message);
            });
        }
        if !aligned {
            return Err(ParseError::IndentMismatch {
                file: file.to_string(),
                line: line_number,
                indent,
            });
        }

        if let Some(filter) = tracker.top_filter_mut() {
            filter.check(&words, indent);
        }

        let (table, context, comment) = {
            let top = tracker.top();
            (top.table, top.context.clone(), top.comment.clone())
        };
        let mut matched = false;
        if let Some(table) = table {
            if let Some(node) = table.iter().find(|node| node.matches(&words)) {
                matched = true;
                let mut fresh_filter: Option<Box<dyn SemanticFilter>> = node
                    .filter_kind()
                    .map(|kind| kind.instantiate(&words, indent, file, line_number));

                for (idx, msg_context, msg_comment) in node.translatables(&words, &context, &comment) {
                    if idx >= words.len() {
                        continue;
                    }
                    let message =
                        Message::singular(words[idx].clone(), msg_context, msg_comment, file, line_number);
                    let filtered = {
                        let mut emit = |m: Message| {
                            let _ = (callback)(&m);
                        };
                        if let Some(filter) = fresh_filter.as_mut() {
                            filter.filter(message, &mut emit)
                        } else if let Some(filter) = tracker.top_filter_mut() {
                            filter.filter(message, &mut emit)
                        } else {
                            Some(message)
                        }
                    };
                    if let Some(filtered) = filtered {
                        if let Some(replacement) = (callback)(&filtered) {
                            quotes[idx] = choose_quote(&replacement);
                            closed[idx] = true;
                            words[idx] = replacement;
                        }
                    }
                }

                if let Some((block_context, block_comment)) = node.here_text_spec(&words, &context, &comment) {
                    *here_text = Some(HereText::new(
                        indent,
                        &words,
                        block_context,
                        block_comment,
                        file,
                        line_number,
                    ));
                    // the opening line is part of the block text
                    return Ok(prefix);
                }
                let (child_table, child_context, child_comment) = node.child_spec(&words, &context, &comment);
                tracker.push(Some(child_table), child_context, child_comment, fresh_filter);
            }
        }
        if !matched {
            // unrecognized construct, block and all
            tracker.push(None, String::new(), String::new(), None);
        }

        let reconstructed = TokenizedLine {
            words,
            quotes,
            closed,
            delims,
            indent,
        }
        .reconstruct();
        Ok(prefix + &reconstructed)
    }

    /// Signal end of input: closes every open block, flushing filters and
    /// finalizing a pending text block. Returns the block's layout, if any.
    /// The parser is ready for the next file afterwards.
    pub fn flush(&mut self) -> String {
        let Self {
            callback,
            tracker,
            here_text,
            remainder,
        } = self;
        let mut popped = Vec::new();
        // depth 0 always aligns with the root frame
        let _ = tracker.align(0, &mut popped);
        for mut filter in popped {
            filter.flush(&mut |message: Message| {
                let _ = (callback)(&message);
            });
        }
        let mut out = String::new();
        if let Some(block) = here_text.take() {
            out = finish_here_text(block, &mut **callback);
            out.push_str(remainder);
            remainder.clear();
        }
        out
    }
}
