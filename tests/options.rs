use wsl_delegate::cli::{self, Opt};
use wsl_delegate::error::{LexErrorKind, ParseError};
use wsl_delegate::options::{lex, OptionDef, OptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Define,
    Path,
    Quiet,
    Out,
}

fn registry() -> OptionSet<Key> {
    OptionSet::new(vec![
        OptionDef::new(Key::Define, Some("D"), Some("define")).with_param().allow_dupe(),
        OptionDef::short(Key::Path, "p").with_param(),
        OptionDef::new(Key::Quiet, Some("q"), Some("quiet")),
        OptionDef::long(Key::Out, "out").with_param(),
    ])
}

fn lex_kind(raw: &str) -> LexErrorKind {
    match registry().tokenize(raw) {
        Err(ParseError::Lex(e)) => e.kind,
        other => panic!("expected lex error for {raw:?}, got {other:?}"),
    }
}

#[test]
fn fused_flags_then_payload() {
    let inv = cli::options().tokenize("-lv gcc -c a.c").unwrap();
    assert!(inv.contains(Opt::ListMounts));
    assert!(inv.contains(Opt::Verbose));
    assert!(!inv.contains(Opt::Help));
    assert_eq!(inv.payload(), "gcc -c a.c");
}

#[test]
fn options_keep_first_seen_order() {
    let inv = cli::options().tokenize("  --verbose -l --template gcc make all").unwrap();
    let keys: Vec<Opt> = inv.options().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Opt::Verbose, Opt::ListMounts, Opt::Template]);
    assert_eq!(inv.first(Opt::Template), Some("gcc"));
    assert_eq!(inv.payload(), "make all");
}

#[test]
fn payload_is_verbatim() {
    let inv = registry().tokenize("-q cc  -I\"x y\"   -o out").unwrap();
    assert_eq!(inv.payload(), "cc  -I\"x y\"   -o out");
}

#[test]
fn empty_input() {
    let inv = registry().tokenize("").unwrap();
    assert_eq!(inv.options().count(), 0);
    assert_eq!(inv.payload(), "");
}

#[test]
fn unknown_option_fails_whole_parse() {
    let err = cli::options().tokenize("-x -h").unwrap_err();
    assert_eq!(err, ParseError::UnknownOption("x".to_string()));
    assert_eq!(err.to_string(), "unknown option: x");
}

#[test]
fn duplicates_dropped_unless_allowed() {
    let inv = registry().tokenize("-q --quiet -Da -D b --define=c run").unwrap();
    let all: Vec<(Key, &str)> = inv.options().collect();
    assert_eq!(all, vec![(Key::Quiet, ""), (Key::Define, "a"), (Key::Define, "b"), (Key::Define, "c")]);
    assert_eq!(inv.first(Key::Define), Some("a"));
}

#[test]
fn repeated_param_option_keeps_first_value() {
    let inv = registry().tokenize("--out a --out b").unwrap();
    let all: Vec<(Key, &str)> = inv.options().collect();
    assert_eq!(all, vec![(Key::Out, "a")]);
}

#[test]
fn quoted_long_parameter() {
    let inv = registry().tokenize("--define=\"a b\" run").unwrap();
    assert_eq!(inv.first(Key::Define), Some("a b"));
    assert_eq!(inv.payload(), "run");
}

#[test]
fn quote_only_recognized_at_parameter_start() {
    let inv = registry().tokenize("-Dname=\"a b\"").unwrap();
    assert_eq!(inv.first(Key::Define), Some("name=\"a"));
    assert_eq!(inv.payload(), "b\"");
}

#[test]
fn escapes_pass_next_char_through() {
    let inv = registry().tokenize("-p\\x").unwrap();
    assert_eq!(inv.first(Key::Path), Some("x"));
    let inv = registry().tokenize("--out \"say \\\"hi\\\"\" go").unwrap();
    assert_eq!(inv.first(Key::Out), Some("say \"hi\""));
    assert_eq!(inv.payload(), "go");
}

#[test]
fn equals_binds_value_without_param() {
    let inv = registry().tokenize("--quiet=yes cmd").unwrap();
    assert_eq!(inv.first(Key::Quiet), Some("yes"));
    assert_eq!(inv.payload(), "cmd");
}

#[test]
fn trailing_flags_are_recorded() {
    let inv = registry().tokenize("-q").unwrap();
    assert!(inv.contains(Key::Quiet));
    let inv = registry().tokenize("--quiet").unwrap();
    assert!(inv.contains(Key::Quiet));
    let inv = registry().tokenize("--out last").unwrap();
    assert_eq!(inv.first(Key::Out), Some("last"));
}

#[test]
fn malformed_lines() {
    assert_eq!(lex_kind("- run"), LexErrorKind::BareMinus);
    assert_eq!(lex_kind("-"), LexErrorKind::BareMinus);
    assert_eq!(lex_kind("-- run"), LexErrorKind::EmptyLongName);
    assert_eq!(lex_kind("--qu!et"), LexErrorKind::BadVerbChar('!'));
    assert_eq!(lex_kind("-q-"), LexErrorKind::BadVerbChar('-'));
    assert_eq!(lex_kind("--out -q"), LexErrorKind::ParamLooksLikeOption);
    assert_eq!(lex_kind("--out"), LexErrorKind::MissingParam);
    assert_eq!(lex_kind("-p "), LexErrorKind::MissingParam);
    assert_eq!(lex_kind("--out \"a\"b"), LexErrorKind::CharAfterQuote('b'));
    assert_eq!(lex_kind("--out \"abc"), LexErrorKind::UnterminatedQuote);
}

#[test]
fn error_offset_points_at_problem() {
    let err = lex("-q --out \"a\"b", |v| v == "out").unwrap_err();
    assert_eq!(err.offset, 12);
    assert_eq!(err.to_string(), "malformed command line at offset 12: unexpected 'b' after closing quote");
}

#[test]
fn lexer_leaves_resolution_to_registry() {
    let raw = lex("-ab --cd=1 rest", |_| false).unwrap();
    let verbs: Vec<&str> = raw.tokens.iter().map(|t| t.verb.as_str()).collect();
    assert_eq!(verbs, vec!["a", "b", "cd"]);
    assert_eq!(raw.tokens[2].value, "1");
    assert_eq!(raw.payload, "rest");
}

#[test]
fn definition_display_and_shape() {
    let set = cli::options();
    let help = set.definition(Opt::Help).unwrap();
    assert_eq!(help.to_string(), "h(help)");
    assert!(!help.is_mappable());
    let template = set.find("template").unwrap();
    assert_eq!(template.to_string(), "(template) <>");
    assert!(template.is_mappable());
    assert!(set.has_param("template"));
    assert!(!set.has_param("l"));
    assert!(!set.has_param("nope"));
}
