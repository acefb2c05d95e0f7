//! End-to-end extraction scenarios
//!
//! Each test feeds a small, realistic data-file excerpt through the full
//! pipeline and verifies both sides of the contract: the catalog receives
//! the right (text, context, comment) entries, and the returned text
//! reproduces the input.

use sky_gettext::extract::{scan, scan_identity};
use sky_gettext::{CatalogEntry, Message, ParseError, Parser};

fn summary(entries: &[CatalogEntry]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|e| (e.text.join("|"), e.context.clone()))
        .collect()
}

#[test]
fn outfit_block_synthesizes_plural_attributes_and_sort_key() {
    let source = "outfit \"Blaster\"\n\tcategory \"Guns\"\n\t\"mass\" 5\n";
    let (catalog, output) = scan_identity(source, "data/outfits.txt").expect("parses");

    // every word on those lines is held back by the outfit filter, so even
    // an answering callback leaves the text untouched
    assert_eq!(output, source);
    assert_eq!(
        summary(catalog.entries()),
        vec![
            ("Blaster|Blasters".to_string(), "outfit".to_string()),
            ("Blasters".to_string(), "outfit".to_string()),
            ("mass".to_string(), "Attribute".to_string()),
            ("mass:".to_string(), "Label of Attribute".to_string()),
            ("Blaster".to_string(), "sort key".to_string()),
        ]
    );
}

#[test]
fn government_without_display_name_gets_a_default() {
    let source = "government Pirate\n\tswizzle 5\n";
    let (catalog, output) = scan(source, "data/governments.txt").expect("parses");
    assert_eq!(output, source);
    let entry = catalog.get("Pirate", "government").expect("synthesized");
    assert_eq!(entry.occurrences[0].comment, "[display name] of [government]: Pirate");
}

#[test]
fn government_with_display_name_keeps_only_the_declared_one() {
    let source = "government Pirate\n\t\"display name\" Buccaneers\n";
    let (catalog, _) = scan(source, "data/governments.txt").expect("parses");
    assert!(catalog.get("Buccaneers", "government").is_some());
    assert!(catalog.get("Pirate", "government").is_none());
}

#[test]
fn mission_npc_ship_instance_chains_comments() {
    let source = "mission \"Rescue\"\n\tnpc\n\t\tship \"Sparrow\" \"Dove\"\n";
    let (catalog, output) = scan(source, "data/missions.txt").expect("parses");
    assert_eq!(output, source);

    // a named instance: only the given name is translatable, and the
    // comment records the whole path down to it
    let dove = catalog.get("Dove", "ship").expect("extracted");
    assert_eq!(dove.occurrences[0].comment, "[ship] npc in [mission]: \"Rescue\"");
    assert!(catalog.get("Sparrow", "ship").is_none());

    // the mission never declared a name, so one is synthesized at the end
    let name = catalog.get("Rescue", "mission").expect("synthesized");
    assert_eq!(name.occurrences[0].comment, "[name] of [mission]: Rescue");
}

#[test]
fn generic_cargo_is_skipped_specific_cargo_is_extracted() {
    let source = "mission \"Haul\"\n\tname \"Haul job\"\n\tcargo Food 5\n\tcargo \"rare spices\" 5\n";
    let (catalog, _) = scan(source, "data/missions.txt").expect("parses");
    assert!(catalog.get("Food", "cargo").is_none());
    assert!(catalog.get("rare spices", "cargo").is_some());
    // the explicit name suppresses the default
    assert!(catalog.get("Haul", "mission").is_none());
}

#[test]
fn short_log_translates_only_its_text() {
    let source = "mission \"Memo\"\n\ton complete\n\t\tlog \"A dark and stormy night.\"\n";
    let (catalog, _) = scan(source, "data/missions.txt").expect("parses");
    let entry = catalog.get("A dark and stormy night.", "").expect("extracted");
    assert_eq!(entry.occurrences[0].comment, "[log]");
    assert!(catalog.entries().iter().all(|e| e.context != "sort key"));
}

#[test]
fn long_log_translates_category_name_and_text_with_sort_keys() {
    let source = "mission \"Memo\"\n\ton complete\n\t\tlog people Jane \"She left.\"\n";
    let (catalog, _) = scan(source, "data/missions.txt").expect("parses");

    let comment = "[log] of people \"Jane\"";
    for text in ["people", "Jane"] {
        let entry = catalog.get(text, "log").expect("extracted");
        assert_eq!(entry.occurrences[0].comment, comment);
        let key = catalog.get(text, "sort key").expect("keyed");
        assert_eq!(key.occurrences[0].comment, format!("[sort key] for {}", comment));
    }
    assert!(catalog.get("She left.", "").is_some());
}

#[test]
fn condition_variables_split_into_prefix_context() {
    let source = "start\n\tset \"license: Navy\"\n\tset \"combat rating\"\n";
    let (catalog, output) = scan(source, "data/start.txt").expect("parses");
    assert_eq!(output, source);
    let entry = catalog.get("Navy License", "license: ").expect("rewritten");
    assert_eq!(entry.occurrences[0].comment, "[set] in [start]");
    // non-condition variables are not extracted at all
    assert_eq!(catalog.len(), 1);
}

#[test]
fn salary_conditions_keep_their_bare_name() {
    let source = "start\n\tset \"salary: crew\"\n";
    let (catalog, _) = scan(source, "data/start.txt").expect("parses");
    assert!(catalog.get("crew", "salary: ").is_some());
}

#[test]
fn license_names_gain_the_license_suffix() {
    let source = "outfit \"Laser\"\n\tlicenses\n\t\tNavy\n";
    let (catalog, _) = scan(source, "data/outfits.txt").expect("parses");
    let entry = catalog.get("Navy License", "license: ").expect("extracted");
    assert_eq!(entry.occurrences[0].comment, "[licenses] in [outfit]: \"Laser\"");
}

#[test]
fn bare_ship_model_gets_plural_noun_and_sort_key_defaults() {
    let source = "ship Sparrow\n";
    let (catalog, _) = scan(source, "data/ships.txt").expect("parses");
    assert_eq!(
        summary(catalog.entries()),
        vec![
            ("Sparrow|Sparrows".to_string(), "ship".to_string()),
            ("ship".to_string(), "ship".to_string()),
            ("Sparrow".to_string(), "sort key".to_string()),
        ]
    );
    let noun = catalog.get("ship", "ship").expect("default noun");
    assert_eq!(noun.occurrences[0].comment, "[noun] of [ship]: \"Sparrow\"");
}

#[test]
fn declared_noun_and_plural_suppress_their_defaults() {
    let source = "ship Sparrow\n\tplural Sparrowes\n\tnoun bird\n";
    let (catalog, _) = scan(source, "data/ships.txt").expect("parses");
    let pair = catalog.get("Sparrow", "ship").expect("pair");
    assert_eq!(pair.text, vec!["Sparrow", "Sparrowes"]);
    assert!(catalog.get("ship", "ship").is_none());
    assert!(catalog.get("bird", "ship").is_some());
}

#[test]
fn interface_buttons_and_labels_use_the_interface_context() {
    let source = "interface \"hud\"\n\tbutton x \"Close\"\n\tlabel \"fuel\"\n";
    let (catalog, _) = scan(source, "data/interfaces.txt").expect("parses");
    assert!(catalog.get("Close", "interface").is_some());
    assert!(catalog.get("fuel", "interface").is_some());
}

#[test]
fn phrase_block_replacement_is_reindented_under_the_base() {
    let source = "phrase \"friendly hail\"\n\tword\n\t\t\"Hello!\"\nsystem Sol\n";
    let mut output = String::new();
    let mut parser = Parser::new(|m: &Message| {
        if m.comment.starts_with("[phrase]") {
            Some("word\n\"Bonjour!\"\n".to_string())
        } else {
            None
        }
    });
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        output.push_str(&parser.parse_line(line, "data/phrases.txt", idx + 1).expect("parses"));
    }
    output.push_str(&parser.flush());
    assert_eq!(output, "word\n\t\"Bonjour!\"\nsystem Sol\n");
}

#[test]
fn replacements_pick_the_quote_their_content_needs() {
    let mut parser = Parser::new(|m: &Message| match m.primary() {
        "Sol" => Some("Solar System".to_string()),
        "Rutilicus" => Some("the \"Bright\" one".to_string()),
        _ => None,
    });
    let a = parser.parse_line("system Sol\n", "t", 1).expect("parses");
    assert_eq!(a, "system \"Solar System\"\n");
    let b = parser.parse_line("system Rutilicus\n", "t", 2).expect("parses");
    assert_eq!(b, "system `the \"Bright\" one`\n");
}

#[test]
fn misaligned_indentation_is_reported_with_position() {
    let source = "mission \"Rescue\"\n\t\tblocked \"later\"\n\tclearance granted\n";
    let err = scan(source, "data/missions.txt").unwrap_err();
    assert_eq!(
        err,
        ParseError::IndentMismatch {
            file: "data/missions.txt".to_string(),
            line: 3,
            indent: 1,
        }
    );
}

#[test]
fn unknown_constructs_pass_through_without_extraction() {
    let source = "effect \"spark\"\n\tsound \"crackle\"\n\tframe rate 10\n";
    let (catalog, output) = scan(source, "data/effects.txt").expect("parses");
    assert_eq!(output, source);
    assert!(catalog.is_empty());
}

#[test]
fn sibling_blocks_do_not_leak_state() {
    let source = "government Pirate\n\tswizzle 5\ngovernment Navy\n\t\"display name\" \"Royal Navy\"\n";
    let (catalog, _) = scan(source, "data/governments.txt").expect("parses");
    // only the unnamed government gets a default
    assert!(catalog.get("Pirate", "government").is_some());
    assert!(catalog.get("Navy", "government").is_none());
    assert!(catalog.get("Royal Navy", "government").is_some());
}
