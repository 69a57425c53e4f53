use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use querygram_grammar::{AttrValues, Grammar, GrammarConfig, GrammarError, RuleDef, RuleRef};
use serde::Deserialize;

fn testdata(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../testdata/grammar")
        .join(rel)
}

#[derive(Debug, Deserialize)]
struct GrammarFile {
    #[serde(default)]
    tests: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    query: String,
    #[serde(default = "default_matched")]
    matched: bool,
    #[serde(default)]
    attrs: Option<AttrValues>,
    #[serde(default)]
    remaining: Option<Vec<String>>,
}

fn default_matched() -> bool {
    true
}

#[test]
fn test_realty_grammar_cases() {
    let path = testdata("realty.yaml");
    let grammar = Grammar::from_file(&path).expect("build realty grammar");
    let file: GrammarFile =
        serde_yaml::from_str(&std::fs::read_to_string(&path).expect("read realty grammar"))
            .expect("parse realty cases");
    assert!(!file.tests.is_empty());

    for case in &file.tests {
        let res = grammar.extract(&case.query);
        assert_eq!(res.is_complete(), case.matched, "{}: {res:?}", case.query);
        if let Some(attrs) = &case.attrs {
            assert_eq!(res.attrs(), Some(attrs), "{}", case.query);
        }
        if let Some(remaining) = &case.remaining {
            assert_eq!(res.remaining_tokens(), remaining.as_slice(), "{}", case.query);
        }
    }
}

#[test]
fn test_realty_grammar_rules() {
    let grammar = Grammar::from_file(testdata("realty.yaml")).unwrap();
    assert_eq!(grammar.root_name(), "query");
    assert_eq!(
        grammar.rule_names().collect::<Vec<_>>(),
        vec!["buy", "deal", "location", "query", "realty", "rent", "rooms"]
    );

    let rooms = grammar.rule("rooms").unwrap().parse("2к");
    assert_eq!(rooms.attrs(), Some(&AttrValues::from([(10, vec![2])])));
    assert_eq!(rooms.matched_tokens(), Some(&["2к".to_string()][..]));
    assert!(grammar.rule("missing").is_none());
}

#[test]
fn test_inline_and_named_children() {
    let grammar = Grammar::from_yaml(
        r#"
root: root
rules:
  greeting:
    kind: words
    words: [hello, good morning]
  root:
    kind: full_text
    children:
      - greeting
      - kind: dict
        attribute: 7
        dict:
          world: [1]
          everyone: [2]
"#,
    )
    .unwrap();

    let res = grammar.extract("good morning everyone hello world");
    assert!(res.is_complete());
    assert_eq!(res.attrs(), Some(&AttrValues::from([(7, vec![2, 1])])));
}

#[test]
fn test_shared_once_rule_keeps_identity() {
    let grammar = Grammar::from_yaml(
        r#"
root: root
rules:
  only_once:
    kind: once
    child:
      kind: word
      word: lorem
  root:
    kind: full_text
    children: [only_once, only_once]
"#,
    )
    .unwrap();

    assert!(grammar.extract("lorem").is_complete());
    assert!(!grammar.extract("lorem lorem").has_match());
}

#[test]
fn test_json_definition() {
    let config = GrammarConfig::from_yaml(
        r#"{"root": "w", "rules": {"w": {"kind": "word", "word": "x"}}}"#,
    )
    .unwrap();
    assert_eq!(
        config.rules.get("w"),
        Some(&RuleDef::Word {
            word: "x".to_string()
        })
    );
    assert!(config.build().unwrap().extract("x").is_complete());
}

#[test]
fn test_config_round_trips_structure() {
    let config = GrammarConfig {
        root: "root".to_string(),
        rules: BTreeMap::from([(
            "root".to_string(),
            RuleDef::Once {
                child: Box::new(RuleRef::Inline(RuleDef::Word {
                    word: "x".to_string(),
                })),
            },
        )]),
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert_eq!(GrammarConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_attr_values_json() {
    let attrs = AttrValues::from([(10, vec![2, 3]), (1, vec![1])]);
    let json = serde_json::to_string(&attrs).unwrap();
    assert_eq!(json, r#"{"1":[1],"10":[2,3]}"#);

    let parsed: AttrValues = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, attrs);
}

#[test]
fn test_unknown_rule() {
    let err = Grammar::from_yaml(
        r#"
root: root
rules:
  root:
    kind: one_of
    children: [missing]
"#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::UnknownRule(ref name) if name == "missing"), "{err}");
}

#[test]
fn test_unknown_root() {
    let err = Grammar::from_yaml("root: nowhere\nrules: {}\n").unwrap_err();
    assert!(matches!(err, GrammarError::UnknownRule(ref name) if name == "nowhere"), "{err}");
}

#[test]
fn test_cyclic_rule() {
    let err = Grammar::from_yaml(
        r#"
root: a
rules:
  a:
    kind: sequence
    children: [b]
  b:
    kind: once
    child: a
"#,
    )
    .unwrap_err();
    match err {
        GrammarError::CyclicRule(chain) => assert_eq!(chain, "a -> b -> a"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_definition() {
    let err = Grammar::from_yaml("root: a\nrules:\n  a:\n    kind: regex\n").unwrap_err();
    assert!(matches!(err, GrammarError::Yaml(_)), "{err}");
}

#[test]
fn test_missing_file() {
    let err = Grammar::from_file(testdata("does-not-exist.yaml")).unwrap_err();
    assert!(matches!(err, GrammarError::Io { .. }), "{err}");
    assert!(err.to_string().contains("does-not-exist.yaml"));
}

#[test]
fn test_empty_parts_build_but_never_match() {
    let grammar = Grammar::from_yaml(
        r#"
root: root
rules:
  root:
    kind: one_of
    children:
      - kind: dict
        attribute: 1
        dict: {}
      - kind: words
        words: []
      - kind: sequence
        children: []
      - kind: try_all
        children: []
"#,
    )
    .unwrap();
    let res = grammar.extract("anything at all");
    assert!(!res.has_match());
    assert_eq!(res.remaining_tokens(), ["anything", "at", "all"]);
}

#[test]
fn test_grammar_shared_between_threads() {
    let grammar = Grammar::from_file(testdata("realty.yaml")).unwrap();
    let queries = [
        (
            "снять квартиру посуточно",
            AttrValues::from([(1, vec![1]), (2, vec![2])]),
        ),
        (
            "купить 2к квартиру у метро",
            AttrValues::from([(3, vec![3]), (10, vec![2]), (20, vec![2])]),
        ),
    ];

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let grammar = &grammar;
            let queries = &queries;
            scope.spawn(move || {
                for round in 0..100 {
                    let (query, expected) = &queries[(worker + round) % queries.len()];
                    let res = grammar.extract(query);
                    assert!(res.is_complete(), "{query}");
                    assert_eq!(res.attrs(), Some(expected), "{query}");
                }
            });
        }
    });
}
