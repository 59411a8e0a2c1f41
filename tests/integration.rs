//! Integration tests for curly-quotes

use curly_quotes::{
    ast::{Node, NodeKind},
    config::Config,
    diagnostics::Severity,
    engine::LintEngine,
    output::format_json,
    parser::MarkupDocument,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_path().join(name)).unwrap()
}

#[test]
fn test_parse_fixtures() {
    for name in ["straight.xhtml", "clean.xhtml", "with-disable.xhtml"] {
        let doc = MarkupDocument::parse_file(&fixtures_path().join(name)).unwrap();
        assert!(!doc.root.children.is_empty(), "{name}");
    }
}

#[test]
fn test_parse_file_with_disable_comments() {
    let doc = MarkupDocument::parse_file(&fixtures_path().join("with-disable.xhtml")).unwrap();
    assert_eq!(doc.inline_disables.len(), 2);
}

#[test]
fn test_lint_straight_quotes() {
    let engine = LintEngine::new(Config::default());
    let diagnostics = engine.lint_file(&fixtures_path().join("straight.xhtml")).unwrap();

    let found: Vec<(usize, &str)> = diagnostics
        .iter()
        .map(|d| (d.location.line, d.node_type))
        .collect();
    assert_eq!(found, vec![(5, "Text"), (9, "Literal"), (9, "Text"), (10, "Text")]);

    assert!(diagnostics.iter().all(|d| d.rule_id == "no-straight-quotes"));
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
    assert!(diagnostics.iter().all(|d| d.fix.is_some()));
}

#[test]
fn test_lint_clean_file() {
    let engine = LintEngine::new(Config::default());
    let diagnostics = engine.lint_file(&fixtures_path().join("clean.xhtml")).unwrap();
    assert!(diagnostics.is_empty());
}

#[test]
fn test_lint_respects_disable_comments() {
    let engine = LintEngine::new(Config::default());
    let diagnostics = engine.lint_file(&fixtures_path().join("with-disable.xhtml")).unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].location.line, 5);
    assert_eq!(
        diagnostics[0].fix.as_ref().unwrap().replacement,
        "But “this” one"
    );
}

#[test]
fn test_fix_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.xhtml");
    fs::write(&path, read_fixture("straight.xhtml")).unwrap();

    let engine = LintEngine::new(Config::default());
    let report = engine.fix_file(&path).unwrap();

    assert_eq!(report.applied, 4);
    assert!(report.remaining.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), read_fixture("straight.fixed.xhtml"));

    // A second run has nothing left to do
    assert!(engine.lint_file(&path).unwrap().is_empty());
    assert_eq!(engine.fix_file(&path).unwrap().applied, 0);
}

#[test]
fn test_config_discovery() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".curlyquotesrc.json"),
        r#"{
  "severity": "error",
  "options": {
    "double-opening": "«",
    "double-closing": "»",
    "ignored-elements": ["title", "script", "style"]
  }
}"#,
    )
    .unwrap();

    let nested = dir.path().join("site/pages");
    fs::create_dir_all(&nested).unwrap();

    let (found, config) = Config::find_and_load(&nested).unwrap().unwrap();
    assert_eq!(found, dir.path().join(".curlyquotesrc.json"));

    let engine = LintEngine::new(config);
    let diagnostics = engine.lint_file(&fixtures_path().join("straight.xhtml")).unwrap();

    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
    assert_eq!(
        diagnostics[1].fix.as_ref().unwrap().replacement,
        "I’m a «web developer»"
    );
}

#[test]
fn test_yaml_config_with_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("curlyquotes.yaml");
    fs::write(
        &config_path,
        "exclude:\n  - \"**/straight.xhtml\"\noptions:\n  ignored-jsx-attributes: [title]\n",
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    assert_eq!(config.options.ignored_attributes, vec!["title"]);

    let engine = LintEngine::new(config);
    assert!(engine.lint_file(&fixtures_path().join("straight.xhtml")).unwrap().is_empty());
}

#[test]
fn test_json_output_for_fixture() {
    let engine = LintEngine::new(Config::default());
    let diagnostics = engine.lint_file(&fixtures_path().join("straight.xhtml")).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&format_json(&diagnostics)).unwrap();
    assert_eq!(parsed["summary"]["total"], 4);
    assert_eq!(parsed["summary"]["fixable"], 4);
    assert_eq!(parsed["summary"]["warnings"], 4);
    assert_eq!(parsed["diagnostics"][0]["fix"]["replacement"], "Fish ‘n’ Chips");
}

/// A script frontend lowers `const s = `He said "${greet('it\'s')}"`;`
#[test]
fn test_lint_tree_from_script_frontend() {
    let source = r#"const s = `He said "${greet('it\'s')}"`;"#;
    let template_start = source.find('`').unwrap();
    let template_end = source.rfind('`').unwrap() + 1;
    let call_start = source.find("greet").unwrap();
    let literal_start = source.find("'it").unwrap();
    let literal_end = literal_start + r#"'it\'s'"#.len();

    let root = Node::new(NodeKind::Program, 0..source.len()).with_children(vec![Node::new(
        NodeKind::TemplateLiteral { tagged: false },
        template_start..template_end,
    )
    .with_children(vec![Node::new(
        NodeKind::Call {
            callee: Some("greet".to_string()),
        },
        call_start..literal_end + 1,
    )
    .with_children(vec![Node::new(
        NodeKind::StringLiteral,
        literal_start..literal_end,
    )])])]);

    let engine = LintEngine::new(Config::default());
    let diagnostics = engine.lint_tree(source, &root, Path::new("greeting.js"));

    let fixes: Vec<(&str, &str)> = diagnostics
        .iter()
        .map(|d| (d.node_type, d.fix.as_ref().unwrap().replacement.as_str()))
        .collect();
    assert_eq!(
        fixes,
        vec![
            ("TemplateLiteral", r#"`He said “${greet('it\'s')}”`"#),
            ("Literal", "'it’s'"),
        ]
    );
}
