//! Semantic filters
//!
//! Filters carry the special-case knowledge that cannot be expressed as
//! static per-node grammar rules: default plural forms and display names
//! that the data file never spells out, sort keys, attribute/label pairing,
//! and the condition variables that encode a license or salary name.
//!
//! A filter is strictly block-scoped. It is constructed when its grammar
//! node matches, observes every direct child line of the block through
//! [`SemanticFilter::check`], may veto or rewrite each extracted message
//! through [`SemanticFilter::filter`], and emits its synthesized entries
//! exactly once in [`SemanticFilter::flush`] when the block's indentation
//! frame is popped. Entries a filter emits itself go straight to the
//! catalog; they never affect the reconstructed line.

use crate::catalog::Message;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sink for entries a filter synthesizes on its own.
pub type Emit<'a> = dyn FnMut(Message) + 'a;

pub trait SemanticFilter {
    /// Observe the words of a direct child line of the block.
    fn check(&mut self, _words: &[String], _indent: usize) {}

    /// Filter one extracted message. Returning `None` drops the entry;
    /// returning a different message rewrites it. Side entries may be
    /// pushed through `emit`.
    fn filter(&mut self, message: Message, _emit: &mut Emit) -> Option<Message> {
        Some(message)
    }

    /// Called when the block is left. All synthesized entries for the block
    /// must be emitted here, exactly once.
    fn flush(&mut self, _emit: &mut Emit) {}
}

/// The filter a grammar node asks for; acts as the factory for instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    ConditionVariable,
    Government,
    License,
    Log,
    Mission,
    Outfit,
    Ship,
}

impl FilterKind {
    pub fn instantiate(
        self,
        words: &[String],
        _indent: usize,
        file: &str,
        line: usize,
    ) -> Box<dyn SemanticFilter> {
        match self {
            FilterKind::ConditionVariable => Box::new(ConditionVariableFilter),
            FilterKind::Government => Box::new(DefaultNameFilter::government(words, file, line)),
            FilterKind::License => Box::new(LicenseFilter),
            FilterKind::Log => Box::new(LogFilter::new(words)),
            FilterKind::Mission => Box::new(DefaultNameFilter::mission(words, file, line)),
            FilterKind::Outfit => Box::new(OutfitFilter::new()),
            FilterKind::Ship => Box::new(ShipFilter::new(words)),
        }
    }
}

/// Condition variable prefixes worth translating, paired with the postfix
/// appended to the extracted name.
pub(crate) const CONDITION_PREFIXES: &[(&str, &str)] = &[("license: ", " License"), ("salary: ", "")];

static CONDITION_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:license: |salary: )").expect("valid prefix pattern"));

/// Whether a condition variable encodes a translatable name.
pub fn is_condition_variable(text: &str) -> bool {
    CONDITION_PREFIX_RE.is_match(text)
}

/// Rewrites `license: X` / `salary: X` condition variables: the prefix
/// becomes the context, the suffix (plus postfix) the translatable text.
/// Everything else is dropped.
struct ConditionVariableFilter;

impl SemanticFilter for ConditionVariableFilter {
    fn filter(&mut self, message: Message, _emit: &mut Emit) -> Option<Message> {
        let text = message.primary();
        for &(prefix, postfix) in CONDITION_PREFIXES {
            if let Some(suffix) = text.strip_prefix(prefix) {
                return Some(Message::singular(
                    format!("{}{}", suffix, postfix),
                    prefix,
                    message.comment.clone(),
                    message.file.clone(),
                    message.line,
                ));
            }
        }
        None
    }
}

/// Appends " License" to each name listed in a `licenses` block.
struct LicenseFilter;

impl SemanticFilter for LicenseFilter {
    fn filter(&mut self, message: Message, _emit: &mut Emit) -> Option<Message> {
        let mut message = message;
        if let Some(first) = message.text.first_mut() {
            first.push_str(" License");
        }
        Some(message)
    }
}

/// Synthesizes the default display name of a `government` block or the
/// default name of a `mission` block when no child ever declared one.
struct DefaultNameFilter {
    identifier: String,
    has_name: bool,
    file: String,
    line: usize,
    /// `name` child keyword, context, and comment shape differ between the
    /// two node types.
    name_keyword: &'static str,
    exact_pair: bool,
    context: &'static str,
    comment_prefix: &'static str,
}

impl DefaultNameFilter {
    fn government(words: &[String], file: &str, line: usize) -> Self {
        DefaultNameFilter {
            identifier: words.get(1).cloned().unwrap_or_default(),
            has_name: false,
            file: file.to_string(),
            line,
            name_keyword: "display name",
            exact_pair: false,
            context: "government",
            comment_prefix: "[display name] of [government]: ",
        }
    }

    fn mission(words: &[String], file: &str, line: usize) -> Self {
        DefaultNameFilter {
            identifier: words.get(1).cloned().unwrap_or_default(),
            has_name: false,
            file: file.to_string(),
            line,
            name_keyword: "name",
            exact_pair: true,
            context: "mission",
            comment_prefix: "[name] of [mission]: ",
        }
    }
}

impl SemanticFilter for DefaultNameFilter {
    fn check(&mut self, words: &[String], _indent: usize) {
        let keyword_matches = words.first().map_or(false, |w| w == self.name_keyword);
        if keyword_matches && (!self.exact_pair || words.len() == 2) {
            self.has_name = true;
        }
    }

    fn flush(&mut self, emit: &mut Emit) {
        if !self.has_name {
            emit(Message::singular(
                self.identifier.clone(),
                self.context,
                format!("{}{}", self.comment_prefix, self.identifier),
                self.file.clone(),
                self.line,
            ));
        }
    }
}

/// Emits a `sort key` entry for the first identifying word(s) of a
/// multi-arity `log` block.
struct LogFilter {
    count: usize,
}

impl LogFilter {
    fn new(words: &[String]) -> Self {
        // short logs have no special key words to index
        LogFilter {
            count: if words.len() > 2 { 0 } else { 2 },
        }
    }
}

impl SemanticFilter for LogFilter {
    fn filter(&mut self, message: Message, emit: &mut Emit) -> Option<Message> {
        if self.count <= 1 {
            emit(Message {
                text: message.text.clone(),
                context: "sort key".to_string(),
                comment: format!("[sort key] for {}", message.comment),
                file: message.file.clone(),
                line: message.line,
            });
        }
        self.count += 1;
        Some(message)
    }
}

/// Attribute names that the game never displays and that must therefore not
/// be offered for translation.
const EXCLUDED_ATTRIBUTES: &[&str] = &[
    "category",
    "plural",
    "flare sprite",
    "flare sound",
    "steering flare sprite",
    "steering flare sound",
    "afterburner effect",
    "flotsam sprite",
    "thumbnail",
    "weapon",
    "ammo",
    "description",
    "licenses",
];

/// Captured context/comment/file/line of the block's opening line, needed
/// because every synthesized entry points back at it.
#[derive(Clone)]
struct FirstLine {
    context: String,
    comment: String,
    file: String,
    line: usize,
}

impl FirstLine {
    fn capture(message: &Message) -> Self {
        FirstLine {
            context: message.context.clone(),
            comment: message.comment.clone(),
            file: message.file.clone(),
            line: message.line,
        }
    }
}

/// Suppresses the outfit identifier's direct entry and re-emits it on flush
/// as a (singular, plural) pair plus a plural-only entry, pairs each
/// displayed attribute with a separately-contexted label entry, and
/// synthesizes the sort key.
struct OutfitFilter {
    identifier: String,
    plural: String,
    first: bool,
    first_line: Option<FirstLine>,
    attributes: Vec<Message>,
}

impl OutfitFilter {
    fn new() -> Self {
        OutfitFilter {
            identifier: String::new(),
            plural: String::new(),
            first: true,
            first_line: None,
            attributes: Vec::new(),
        }
    }
}

impl SemanticFilter for OutfitFilter {
    fn check(&mut self, words: &[String], _indent: usize) {
        if words.len() >= 2 && words[0] == "plural" {
            self.plural = words[1].clone();
        }
    }

    fn filter(&mut self, message: Message, _emit: &mut Emit) -> Option<Message> {
        if self.first {
            // the outfit identifier; held back until flush
            self.identifier = message.primary().to_string();
            self.plural = format!("{}s", self.identifier);
            self.first_line = Some(FirstLine::capture(&message));
            self.first = false;
            None
        } else if message.context == "Label of Attribute" {
            let attribute = message.primary().to_string();
            if !EXCLUDED_ATTRIBUTES.contains(&attribute.as_str()) {
                self.attributes.push(Message::singular(
                    attribute.clone(),
                    "Attribute",
                    message.comment.clone(),
                    message.file.clone(),
                    message.line,
                ));
                self.attributes.push(Message::singular(
                    format!("{}:", attribute),
                    "Label of Attribute",
                    message.comment.clone(),
                    message.file.clone(),
                    message.line,
                ));
            }
            None
        } else {
            Some(message)
        }
    }

    fn flush(&mut self, emit: &mut Emit) {
        let Some(first) = self.first_line.take() else {
            return;
        };
        emit(Message::with_plural(
            self.identifier.clone(),
            self.plural.clone(),
            first.context.clone(),
            first.comment.clone(),
            first.file.clone(),
            first.line,
        ));
        emit(Message::singular(
            self.plural.clone(),
            first.context.clone(),
            first.comment.clone(),
            first.file.clone(),
            first.line,
        ));
        for attribute in self.attributes.drain(..) {
            emit(attribute);
        }
        emit(Message::singular(
            self.identifier.clone(),
            "sort key",
            format!("[sort key] for {}", first.comment),
            first.file,
            first.line,
        ));
    }
}

/// Same identifier handling for `ship` blocks declared with a bare model
/// name, plus the default noun.
struct ShipFilter {
    needs_synthesis: bool,
    identifier: String,
    plural: String,
    noun: Option<String>,
    first: bool,
    first_line: Option<FirstLine>,
}

impl ShipFilter {
    fn new(words: &[String]) -> Self {
        ShipFilter {
            // `ship <model> <name>` lines name an instance, not a model;
            // only bare `ship <model>` blocks get synthesized defaults
            needs_synthesis: words.len() == 2,
            identifier: String::new(),
            plural: String::new(),
            noun: None,
            first: true,
            first_line: None,
        }
    }
}

impl SemanticFilter for ShipFilter {
    fn check(&mut self, words: &[String], _indent: usize) {
        if words.len() >= 2 {
            if words[0] == "plural" {
                self.plural = words[1].clone();
            } else if words[0] == "noun" {
                self.noun = Some(words[1].clone());
            }
        }
    }

    fn filter(&mut self, message: Message, _emit: &mut Emit) -> Option<Message> {
        if self.needs_synthesis && self.first {
            self.identifier = message.primary().to_string();
            self.plural = format!("{}s", self.identifier);
            self.first_line = Some(FirstLine::capture(&message));
            self.first = false;
            None
        } else {
            Some(message)
        }
    }

    fn flush(&mut self, emit: &mut Emit) {
        if !self.needs_synthesis {
            return;
        }
        let Some(first) = self.first_line.take() else {
            return;
        };
        emit(Message::with_plural(
            self.identifier.clone(),
            self.plural.clone(),
            first.context.clone(),
            first.comment.clone(),
            first.file.clone(),
            first.line,
        ));
        if self.noun.is_none() {
            emit(Message::singular(
                "ship",
                first.context.clone(),
                format!("[noun] of {}", first.comment),
                first.file.clone(),
                first.line,
            ));
        }
        emit(Message::singular(
            self.identifier.clone(),
            "sort key",
            format!("[sort key] for {}", first.comment),
            first.file,
            first.line,
        ));
    }
}
