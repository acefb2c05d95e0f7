//! Declarative grammar for Endless Sky data files
//!
//! The grammar is data, not code: each node describes, for one keyword (or
//! a wildcard/predicate match), which word positions are translatable, how
//! to format their context and comment strings, which child table applies
//! to more-indented lines, and whether the block body is free-form text
//! instead of structured children. Tables are scanned in declaration order
//! and the first matching node wins.
//!
//! All tables are immutable statics built once on first touch; nodes
//! reference shared child tables by `&'static`, so the whole grammar is one
//! read-only object graph.
//!
//! Context/comment templates use `{0}` for the inherited context/comment
//! and `{n}` for the line's n-th word (`{1}` is the keyword). A placeholder
//! referring to a word the line does not have renders as the empty string.

use crate::filters::{is_condition_variable, FilterKind};
use once_cell::sync::Lazy;

pub type GrammarTable = Vec<GrammarNode>;

/// Shared reference to a child table. `Lazy` statics can point at each
/// other, which is all the cross-referencing the grammar needs.
pub type TableRef = &'static Lazy<GrammarTable>;

type MatchFn = fn(&[String]) -> bool;
type PosFn = fn(&[String]) -> Vec<usize>;

/// How a node decides whether it applies to a line.
enum Matcher {
    /// The first word equals this keyword.
    Keyword(&'static str),
    /// Matches any line.
    Any,
    /// Arbitrary predicate over the whole word list.
    Predicate(MatchFn),
}

/// Which word positions of a matched line are translatable.
enum Positions {
    Fixed(&'static [usize]),
    /// Computed from the matched words; enables arity-dependent extraction.
    ByWords(PosFn),
}

/// The closed set of comment-generation behaviors.
enum NodeKind {
    /// Context and comment come from templates.
    Standard,
    /// The comment is the whole line joined by spaces, the given infix, and
    /// the inherited comment concatenated (mission `npc`/`on` nodes).
    ConcatComment,
    /// The multi-arity `log` node: a two-word log translates only its text,
    /// a longer one also translates its category and key words under the
    /// `log` context.
    Log,
}

pub struct ChildSpec {
    table: TableRef,
    context_fmt: &'static str,
    comment_fmt: &'static str,
}

struct HereTextSpec {
    context_fmt: &'static str,
    comment_fmt: &'static str,
}

pub struct GrammarNode {
    matcher: Matcher,
    kind: NodeKind,
    positions: Positions,
    context_fmt: &'static str,
    comment_fmt: &'static str,
    child: Option<ChildSpec>,
    here_text: Option<HereTextSpec>,
    filter: Option<FilterKind>,
}

/// Table pushed for matched nodes that declare no children: nothing matches
/// inside, but the block is still a recognized construct.
pub static EMPTY: Lazy<GrammarTable> = Lazy::new(Vec::new);

impl GrammarNode {
    fn new(matcher: Matcher) -> Self {
        GrammarNode {
            matcher,
            kind: NodeKind::Standard,
            positions: Positions::Fixed(&[]),
            context_fmt: "",
            comment_fmt: "",
            child: None,
            here_text: None,
            filter: None,
        }
    }

    fn keyword(keyword: &'static str) -> Self {
        GrammarNode::new(Matcher::Keyword(keyword))
    }

    fn any() -> Self {
        GrammarNode::new(Matcher::Any)
    }

    fn predicate(f: MatchFn) -> Self {
        GrammarNode::new(Matcher::Predicate(f))
    }

    fn log() -> Self {
        let mut node = GrammarNode::keyword("log");
        node.kind = NodeKind::Log;
        node
    }

    fn positions(mut self, positions: &'static [usize]) -> Self {
        self.positions = Positions::Fixed(positions);
        self
    }

    fn positions_by(mut self, f: PosFn) -> Self {
        self.positions = Positions::ByWords(f);
        self
    }

    fn context(mut self, fmt: &'static str) -> Self {
        self.context_fmt = fmt;
        self
    }

    fn comment(mut self, fmt: &'static str) -> Self {
        self.comment_fmt = fmt;
        self
    }

    fn concat_comment(mut self) -> Self {
        self.kind = NodeKind::ConcatComment;
        self
    }

    fn children(mut self, table: TableRef, context_fmt: &'static str, comment_fmt: &'static str) -> Self {
        self.child = Some(ChildSpec {
            table,
            context_fmt,
            comment_fmt,
        });
        self
    }

    fn here_text(mut self, context_fmt: &'static str, comment_fmt: &'static str) -> Self {
        self.here_text = Some(HereTextSpec {
            context_fmt,
            comment_fmt,
        });
        self
    }

    fn filter(mut self, kind: FilterKind) -> Self {
        self.filter = Some(kind);
        self
    }

    /// Whether this node applies to the line.
    pub fn matches(&self, words: &[String]) -> bool {
        match &self.matcher {
            Matcher::Keyword(kw) => words.first().map_or(false, |w| w == kw),
            Matcher::Any => true,
            Matcher::Predicate(f) => f(words),
        }
    }

    /// The translatable positions of a matched line, each with its formatted
    /// context and comment.
    pub fn translatables(
        &self,
        words: &[String],
        context: &str,
        comment: &str,
    ) -> Vec<(usize, String, String)> {
        match self.kind {
            NodeKind::Standard => {
                let msg_context = format_template(self.context_fmt, context, words);
                let msg_comment = format_template(self.comment_fmt, comment, words);
                self.position_list(words)
                    .into_iter()
                    .map(|idx| (idx, msg_context.clone(), msg_comment.clone()))
                    .collect()
            }
            NodeKind::ConcatComment => {
                let msg_context = format_template(self.context_fmt, context, words);
                let msg_comment = format!("{}{}{}", words.join(" "), self.comment_fmt, comment);
                self.position_list(words)
                    .into_iter()
                    .map(|idx| (idx, msg_context.clone(), msg_comment.clone()))
                    .collect()
            }
            NodeKind::Log => {
                let cmt = log_comment(words);
                if words.len() == 2 {
                    vec![(1, String::new(), cmt)]
                } else {
                    vec![
                        (1, "log".to_string(), cmt.clone()),
                        (2, "log".to_string(), cmt.clone()),
                        (3, String::new(), cmt),
                    ]
                }
            }
        }
    }

    /// The table and inherited context/comment for child lines. Matched
    /// nodes without declared children still open a block; it just matches
    /// nothing inside.
    pub fn child_spec(&self, words: &[String], context: &str, comment: &str) -> (TableRef, String, String) {
        let Some(child) = &self.child else {
            return (&EMPTY, String::new(), String::new());
        };
        match self.kind {
            NodeKind::Standard => (
                child.table,
                format_template(child.context_fmt, context, words),
                format_template(child.comment_fmt, comment, words),
            ),
            NodeKind::ConcatComment => (
                child.table,
                format_template(child.context_fmt, context, words),
                format!("{}{}{}", words.join(" "), child.comment_fmt, comment),
            ),
            NodeKind::Log => (child.table, String::new(), log_comment(words)),
        }
    }

    /// Context and comment for a free-form text block, if this node is
    /// marked as text-bearing.
    pub fn here_text_spec(&self, words: &[String], context: &str, comment: &str) -> Option<(String, String)> {
        self.here_text.as_ref().map(|spec| {
            (
                format_template(spec.context_fmt, context, words),
                format_template(spec.comment_fmt, comment, words),
            )
        })
    }

    pub fn filter_kind(&self) -> Option<FilterKind> {
        self.filter
    }

    fn position_list(&self, words: &[String]) -> Vec<usize> {
        match &self.positions {
            Positions::Fixed(list) => list.to_vec(),
            Positions::ByWords(f) => f(words),
        }
    }
}

fn log_comment(words: &[String]) -> String {
    if words.len() == 2 {
        "[log]".to_string()
    } else {
        format!(
            "[log] of {} \"{}\"",
            words.get(1).map(String::as_str).unwrap_or(""),
            words.get(2).map(String::as_str).unwrap_or(""),
        )
    }
}

/// Substitute `{0}` (inherited value) and `{n}` (n-th word) placeholders.
pub(crate) fn format_template(fmt: &str, inherited: &str, words: &[String]) -> String {
    let mut out = String::with_capacity(fmt.len() + 16);
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(d);
                chars.next();
            } else {
                break;
            }
        }
        if !digits.is_empty() && chars.peek() == Some(&'}') {
            chars.next();
            let n: usize = digits.parse().unwrap_or(0);
            if n == 0 {
                out.push_str(inherited);
            } else if let Some(word) = words.get(n - 1) {
                out.push_str(word);
            }
        } else {
            out.push('{');
            out.push_str(&digits);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Position and predicate functions

fn condition_first_word(words: &[String]) -> bool {
    words.first().map_or(false, |w| is_condition_variable(w))
}

fn condition_value_positions(words: &[String]) -> Vec<usize> {
    if words.get(1).map_or(false, |w| is_condition_variable(w)) {
        vec![1]
    } else {
        Vec::new()
    }
}

fn add_positions(words: &[String]) -> Vec<usize> {
    match words.get(1).map(String::as_str) {
        Some("description") | Some("spaceport") => vec![2],
        _ => Vec::new(),
    }
}

fn spaceport_positions(words: &[String]) -> Vec<usize> {
    if words.get(1).map_or(false, |w| w != "clear") {
        vec![1]
    } else {
        Vec::new()
    }
}

fn dialog_positions(words: &[String]) -> Vec<usize> {
    if words.len() <= 1 || words[1] == "phrase" {
        Vec::new()
    } else {
        vec![1]
    }
}

fn give_positions(words: &[String]) -> Vec<usize> {
    if words.len() >= 4 && words[1] == "ship" {
        vec![3]
    } else {
        Vec::new()
    }
}

fn ship_top_positions(words: &[String]) -> Vec<usize> {
    if words.len() > 2 {
        Vec::new()
    } else {
        vec![1]
    }
}

fn ship_npc_positions(words: &[String]) -> Vec<usize> {
    if words.len() > 2 {
        vec![2]
    } else {
        vec![1]
    }
}

fn ship_person_positions(words: &[String]) -> Vec<usize> {
    if words.len() > 2 {
        vec![1, 2]
    } else {
        vec![1]
    }
}

/// Cargo names that the game replaces with a concrete commodity at runtime;
/// they never reach the player as-is.
const GENERIC_CARGO: &[&str] = &[
    "random",
    "Food",
    "Clothing",
    "Metal",
    "Plastic",
    "Equipment",
    "Medical",
    "Industrial",
    "Electronics",
    "Heavy Metals",
    "Luxury Goods",
    "Garbage",
    "Construction",
    "Illegal Substances",
    "Highly Illegal Substances",
    "Illegal Cargo",
    "Highly Illegal Cargo",
];

fn cargo_positions(words: &[String]) -> Vec<usize> {
    match words.get(1) {
        Some(cargo) if !GENERIC_CARGO.contains(&cargo.as_str()) => vec![1],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Leaf node constructors (shared across several tables)

fn name() -> GrammarNode {
    GrammarNode::keyword("name").positions(&[1]).context("{0}").comment("[name] of {0}")
}

fn description() -> GrammarNode {
    GrammarNode::keyword("description").positions(&[1]).comment("[description] of {0}")
}

fn display_name() -> GrammarNode {
    GrammarNode::keyword("display name").positions(&[1]).context("{0}").comment("[display name] of {0}")
}

fn illegal() -> GrammarNode {
    GrammarNode::keyword("illegal").positions(&[2]).comment("[illegal] in {0}")
}

fn string() -> GrammarNode {
    GrammarNode::any().positions(&[0]).comment("{0}")
}

fn string_with_context() -> GrammarNode {
    GrammarNode::any().positions(&[0]).context("{0}").comment("{0}")
}

fn assign() -> GrammarNode {
    GrammarNode::predicate(condition_first_word)
        .positions(&[0])
        .context("Condition variable")
        .comment("[assign] in {0}")
        .filter(FilterKind::ConditionVariable)
}

fn clear() -> GrammarNode {
    GrammarNode::keyword("clear")
        .positions_by(condition_value_positions)
        .context("Condition variable")
        .comment("[{1}] in {0}")
        .filter(FilterKind::ConditionVariable)
}

fn set() -> GrammarNode {
    GrammarNode::keyword("set")
        .positions_by(condition_value_positions)
        .context("Condition variable")
        .comment("[{1}] in {0}")
        .filter(FilterKind::ConditionVariable)
}

fn licenses() -> GrammarNode {
    GrammarNode::keyword("licenses")
        .children(&LICENSE_NAMES, "license: ", "[licenses] in {0}")
        .filter(FilterKind::License)
}

fn inner_phrase() -> GrammarNode {
    GrammarNode::keyword("phrase").here_text("", "[phrase] in {0}")
}

fn inner_conversation() -> GrammarNode {
    GrammarNode::keyword("conversation").children(&CONVERSATION_BODY, "{0}", "[conversation] {0}")
}

fn dialog() -> GrammarNode {
    GrammarNode::keyword("dialog")
        .positions_by(dialog_positions)
        .comment("[dialog] {0}")
        .children(&DIALOG_BODY, "{0}", "[dialog] {0}")
}

// ---------------------------------------------------------------------------
// Tables, leaves first

static CHOICE_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![GrammarNode::keyword("goto"), string_with_context()]
});

static LICENSE_NAMES: Lazy<GrammarTable> = Lazy::new(|| vec![string_with_context()]);

static SHIP_ATTRIBUTES_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![licenses()]);

static CONVERSATION_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("apply"),
        GrammarNode::keyword("branch"),
        GrammarNode::keyword("choice").children(&CHOICE_BODY, "{0}", "a choice of {0}"),
        GrammarNode::keyword("label"),
        GrammarNode::keyword("name"),
        GrammarNode::keyword("scene"),
        string_with_context(),
    ]
});

static PLANET_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("add").positions_by(add_positions).comment("add [{2}] of {0}"),
        description(),
        name(),
        GrammarNode::keyword("spaceport")
            .positions_by(spaceport_positions)
            .comment("[spaceport] of {0}"),
    ]
});

static SHIP_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        description(),
        GrammarNode::keyword("model name").positions(&[1]).context("{0}").comment("[model name] of {0}"),
        name(),
        GrammarNode::keyword("noun").positions(&[1]).context("{0}").comment("[noun] of {0}"),
        GrammarNode::keyword("plural").positions(&[1]).context("{0}").comment("plural form of {0}"),
        GrammarNode::keyword("attributes").children(&SHIP_ATTRIBUTES_BODY, "{0}", "[attributes] of {0}"),
    ]
});

static DIALOG_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![inner_phrase(), string()]);

static LOG_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string()]);

static CARGO_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![illegal()]);

static COMMODITY_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![name(), string_with_context()]);

static FULLNAME_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string_with_context()]);

static GOVERNMENT_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![display_name()]);

static NPC_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        inner_conversation(),
        dialog(),
        GrammarNode::keyword("ship")
            .positions_by(ship_npc_positions)
            .context("ship")
            .comment("[ship] {0}")
            .children(&SHIP_BODY, "ship", "[ship] {0}")
            .filter(FilterKind::Ship),
    ]
});

static ON_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        assign(),
        clear(),
        inner_conversation(),
        dialog(),
        GrammarNode::keyword("give").positions_by(give_positions).context("ship").comment("[ship] {0}"),
        GrammarNode::log().children(&LOG_BODY, "", "").filter(FilterKind::Log),
        set(),
    ]
});

static EVENT_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("government").children(&GOVERNMENT_BODY, "government", "government \"{2}\" in {0}"),
        GrammarNode::keyword("planet")
            .positions(&[1])
            .context("planet")
            .comment("planet \"{2}\" in {0}")
            .children(&PLANET_BODY, "planet", "planet \"{2}\" in {0}"),
    ]
});

static GALAXY_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![GrammarNode::keyword("sprite").positions(&[1]).context("{0}").comment("[sprite] in {0}")]
});

static HELP_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string()]);

static INTERFACE_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("button").positions(&[2]).context("{0}").comment("[button] in {0}"),
        GrammarNode::keyword("label").positions(&[1]).context("{0}").comment("[label] in {0}"),
    ]
});

static LANGUAGE_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![GrammarNode::keyword("fullname").children(&FULLNAME_BODY, "preferences", "[fullname] in {0}")]
});

static MINABLE_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![name()]);

static MISSION_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("blocked").positions(&[1]).comment("[blocked] in {0}"),
        GrammarNode::keyword("cargo")
            .positions_by(cargo_positions)
            .context("cargo")
            .comment("[cargo] in {0}")
            .children(&CARGO_BODY, "{0}", "[cargo] \"{2}\" in {0}"),
        GrammarNode::keyword("clearance").positions(&[1]).comment("[clearance] in {0}"),
        description(),
        illegal(),
        GrammarNode::keyword("on").concat_comment().children(&ON_BODY, "{0}", " in "),
        GrammarNode::keyword("npc").concat_comment().children(&NPC_BODY, "{0}", " in "),
        GrammarNode::keyword("name").positions(&[1]).context("mission").comment("[name] of {0}"),
    ]
});

static NEWS_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("name").here_text("", "[name] of {0}"),
        GrammarNode::keyword("message").here_text("", "[message] of {0}"),
    ]
});

static OUTFIT_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        description(),
        licenses(),
        name(),
        GrammarNode::keyword("plural").positions(&[1]).context("{0}").comment("plural form of {0}"),
        GrammarNode::any().positions(&[0]).context("Label of Attribute").comment("Attribute of {0}"),
    ]
});

static PERSON_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("ship")
            .positions_by(ship_person_positions)
            .context("ship")
            .comment("[ship] in {0}")
            .children(&SHIP_BODY, "ship", "[ship] in {0}")
            .filter(FilterKind::Ship),
        inner_phrase(),
    ]
});

static RATING_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string_with_context()]);

static START_BODY: Lazy<GrammarTable> =
    Lazy::new(|| vec![assign(), clear(), description(), name(), set()]);

static SYSTEM_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![name()]);

static TIP_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string()]);

static TRADE_BODY: Lazy<GrammarTable> = Lazy::new(|| {
    vec![GrammarNode::keyword("commodity")
        .positions(&[1])
        .context("commodity")
        .comment("[commodity] {2} in {0}")
        .children(&COMMODITY_BODY, "commodity", "[commodity] {2} in {0}")]
});

static CATEGORY_BODY: Lazy<GrammarTable> = Lazy::new(|| vec![string_with_context()]);

/// The document root: every node type that may appear unindented.
pub static TOP_LEVEL: Lazy<GrammarTable> = Lazy::new(|| {
    vec![
        GrammarNode::keyword("conversation").children(&CONVERSATION_BODY, "conversation: {2}", "[conversation]: \"{2}\""),
        GrammarNode::keyword("category").children(&CATEGORY_BODY, "category", "[category]: \"{2}\""),
        GrammarNode::keyword("event").children(&EVENT_BODY, "event", "[event]: \"{2}\""),
        GrammarNode::keyword("galaxy").children(&GALAXY_BODY, "galaxy", "[galaxy]: \"{2}\""),
        GrammarNode::keyword("government")
            .children(&GOVERNMENT_BODY, "government", "[government]: \"{2}\"")
            .filter(FilterKind::Government),
        GrammarNode::keyword("help").children(&HELP_BODY, "{0}", "[help]: \"{2}\""),
        GrammarNode::keyword("interface").children(&INTERFACE_BODY, "interface", "[interface]: \"{2}\""),
        GrammarNode::keyword("landing message").positions(&[1]).comment("[landing message]"),
        GrammarNode::keyword("language").children(&LANGUAGE_BODY, "{0}", "[language]: \"{2}\""),
        GrammarNode::keyword("minable")
            .positions(&[1])
            .context("minable")
            .comment("[minable]: \"{2}\"")
            .children(&MINABLE_BODY, "minable", "[minable]: \"{2}\""),
        GrammarNode::keyword("mission")
            .children(&MISSION_BODY, "mission: {2}", "[mission]: \"{2}\"")
            .filter(FilterKind::Mission),
        GrammarNode::keyword("news").children(&NEWS_BODY, "news: {2}", "[news]: \"{2}\""),
        GrammarNode::keyword("outfit")
            .positions(&[1])
            .context("outfit")
            .comment("[outfit]: \"{2}\"")
            .children(&OUTFIT_BODY, "outfit", "[outfit]: \"{2}\"")
            .filter(FilterKind::Outfit),
        GrammarNode::keyword("person")
            .positions(&[1])
            .context("person")
            .comment("[person]")
            .children(&PERSON_BODY, "person", "[person]: \"{2}\""),
        GrammarNode::keyword("phrase").here_text("", "[phrase]: \"{2}\""),
        GrammarNode::keyword("planet")
            .positions(&[1])
            .context("planet")
            .comment("[planet]: \"{2}\"")
            .children(&PLANET_BODY, "planet", "[planet]: \"{2}\""),
        GrammarNode::keyword("rating").children(&RATING_BODY, "rating", "[rating]: \"{2}\""),
        GrammarNode::keyword("ship")
            .positions_by(ship_top_positions)
            .context("ship")
            .comment("[ship]: \"{2}\"")
            .children(&SHIP_BODY, "ship", "[ship]: \"{2}\"")
            .filter(FilterKind::Ship),
        GrammarNode::keyword("start").children(&START_BODY, "start", "[start]"),
        GrammarNode::keyword("system")
            .positions(&[1])
            .context("system")
            .comment("[system]: \"{2}\"")
            .children(&SYSTEM_BODY, "system", "[system]: \"{2}\""),
        GrammarNode::keyword("tip")
            .positions(&[1])
            .context("Label of Attribute")
            .comment("[tip]")
            .children(&TIP_BODY, "Label of Attribute", "[tip]: \"{2}\""),
        GrammarNode::keyword("trade").children(&TRADE_BODY, "trade", "[trade]"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn find<'a>(table: &'a GrammarTable, line: &[String]) -> Option<&'a GrammarNode> {
        table.iter().find(|node| node.matches(line))
    }

    #[test]
    fn templates_substitute_inherited_value_and_words() {
        let w = words(&["outfit", "Blaster"]);
        assert_eq!(format_template("[outfit]: \"{2}\"", "", &w), "[outfit]: \"Blaster\"");
        assert_eq!(format_template("[name] of {0}", "[ship]: \"Sparrow\"", &w), "[name] of [ship]: \"Sparrow\"");
        // a placeholder beyond the word count renders empty
        assert_eq!(format_template("add [{3}] of {0}", "ctx", &w), "add [] of ctx");
        // stray braces are literal
        assert_eq!(format_template("a {b} c", "", &w), "a {b} c");
    }

    #[test]
    fn first_match_wins_in_declaration_order() {
        let line = words(&["description", "text"]);
        let node = find(&OUTFIT_BODY, &line).expect("matches");
        let extracted = node.translatables(&line, "outfit", "[outfit]: \"X\"");
        // `description` must win over the trailing wildcard
        assert_eq!(extracted, vec![(1, String::new(), "[description] of [outfit]: \"X\"".to_string())]);
    }

    #[test]
    fn wildcard_catches_outfit_attributes() {
        let line = words(&["mass", "5"]);
        let node = find(&OUTFIT_BODY, &line).expect("wildcard matches");
        let extracted = node.translatables(&line, "outfit", "[outfit]: \"X\"");
        // `{0}` in the comment template expands to the inherited comment
        assert_eq!(
            extracted,
            vec![(0, "Label of Attribute".to_string(), "Attribute of [outfit]: \"X\"".to_string())]
        );
    }

    #[test]
    fn unknown_keyword_matches_nothing_at_top_level() {
        assert!(find(&TOP_LEVEL, &words(&["explosion", "small"])).is_none());
    }

    #[test]
    fn ship_arity_controls_extraction() {
        let node = find(&TOP_LEVEL, &words(&["ship", "Sparrow"])).expect("matches");
        assert_eq!(node.translatables(&words(&["ship", "Sparrow"]), "", "").len(), 1);
        // a named instance at top level extracts nothing directly
        assert!(node.translatables(&words(&["ship", "Sparrow", "Dove"]), "", "").is_empty());
    }

    #[test]
    fn condition_nodes_only_fire_on_known_prefixes() {
        let node = find(&START_BODY, &words(&["set", "license: Pilot's"])).expect("matches");
        assert_eq!(node.translatables(&words(&["set", "license: Pilot's"]), "start", "[start]").len(), 1);
        assert!(node.translatables(&words(&["set", "some flag"]), "start", "[start]").is_empty());
    }

    #[test]
    fn assign_matches_by_predicate_not_keyword() {
        assert!(find(&START_BODY, &words(&["salary: crew", "=", "100"])).is_some());
    }

    #[test]
    fn log_node_translatables_depend_on_arity() {
        let node = find(&ON_BODY, &words(&["log", "t"])).expect("matches");
        assert_eq!(
            node.translatables(&words(&["log", "text"]), "", ""),
            vec![(1, String::new(), "[log]".to_string())]
        );
        let long = words(&["log", "people", "Jane", "text"]);
        let extracted = node.translatables(&long, "", "");
        assert_eq!(extracted.len(), 3);
        assert_eq!(extracted[0], (1, "log".to_string(), "[log] of people \"Jane\"".to_string()));
        assert_eq!(extracted[2].0, 3);
        let (_, child_ctx, child_cmt) = node.child_spec(&long, "", "");
        assert_eq!(child_ctx, "");
        assert_eq!(child_cmt, "[log] of people \"Jane\"");
    }

    #[test]
    fn concat_comment_nodes_chain_the_line_into_the_comment() {
        let node = find(&MISSION_BODY, &words(&["on", "offer"])).expect("matches");
        let (_, ctx, cmt) = node.child_spec(&words(&["on", "offer"]), "mission: rescue", "[mission]: \"rescue\"");
        assert_eq!(ctx, "mission: rescue");
        assert_eq!(cmt, "on offer in [mission]: \"rescue\"");
    }

    #[test]
    fn generic_cargo_is_not_translatable() {
        let node = find(&MISSION_BODY, &words(&["cargo", "Food", "5"])).expect("matches");
        assert!(node.translatables(&words(&["cargo", "Food", "5"]), "", "").is_empty());
        assert_eq!(node.translatables(&words(&["cargo", "rare spices", "5"]), "", "").len(), 1);
    }

    #[test]
    fn here_text_nodes_format_their_comment() {
        let node = find(&TOP_LEVEL, &words(&["phrase", "friendly hail"])).expect("matches");
        let (ctx, cmt) = node
            .here_text_spec(&words(&["phrase", "friendly hail"]), "", "")
            .expect("text-bearing");
        assert_eq!(ctx, "");
        assert_eq!(cmt, "[phrase]: \"friendly hail\"");
    }
}
