//! Markup parser - lowers XML, XHTML and SVG documents into a lintable tree

use crate::ast::{Node, NodeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

static DISABLE_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<!--\s*curly-quotes-disable(-next-line)?\s*([\w\-,\s]*?)\s*-->")
        .expect("disable comment pattern is valid")
});

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("Failed to parse markup: {0}")]
    ParseXml(#[from] roxmltree::Error),
}

/// A parsed markup document
#[derive(Debug)]
pub struct MarkupDocument {
    /// The source content (spans index into it)
    pub source: String,
    /// Syntax tree; the root is a [`NodeKind::Program`] covering the whole source
    pub root: Node,
    /// Inline disable directives: line -> directive
    pub inline_disables: HashMap<usize, InlineDisable>,
}

/// Inline disable directive
#[derive(Debug, Clone)]
pub struct InlineDisable {
    /// If empty, all rules are disabled
    pub rules: HashSet<String>,
    /// Whether the comment targets the following line
    pub next_line: bool,
}

impl MarkupDocument {
    pub fn parse_file(path: &Path) -> Result<Self, ParseError> {
        let source = fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    pub fn parse_str(source: &str) -> Result<Self, ParseError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(source, options)?;

        let children = doc.root().children().filter_map(lower).collect();
        let root = Node::new(NodeKind::Program, 0..source.len()).with_children(children);

        Ok(Self {
            source: source.to_string(),
            root,
            inline_disables: Self::parse_inline_disables(source),
        })
    }

    /// Parse inline disable comments from source
    /// Supports:
    /// - <!-- curly-quotes-disable --> - disable all rules for this line
    /// - <!-- curly-quotes-disable rule-id --> - disable specific rules
    /// - <!-- curly-quotes-disable-next-line --> - disable for the next line
    fn parse_inline_disables(source: &str) -> HashMap<usize, InlineDisable> {
        let mut disables = HashMap::new();

        for (index, line) in source.lines().enumerate() {
            let line_num = index + 1;

            for cap in DISABLE_COMMENT.captures_iter(line) {
                let next_line = cap.get(1).is_some();
                let rules: HashSet<String> = cap
                    .get(2)
                    .map_or("", |m| m.as_str())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();

                let target = if next_line { line_num + 1 } else { line_num };
                match disables.entry(target) {
                    Entry::Occupied(mut entry) => {
                        let existing: &mut InlineDisable = entry.get_mut();
                        // An empty set disables every rule and absorbs the other directive
                        if existing.rules.is_empty() || rules.is_empty() {
                            existing.rules.clear();
                        } else {
                            existing.rules.extend(rules);
                        }
                        existing.next_line |= next_line;
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(InlineDisable { rules, next_line });
                    }
                }
            }
        }

        disables
    }

    /// Check if a rule is disabled at a specific line
    pub fn is_rule_disabled_at_line(&self, rule_id: &str, line: usize) -> bool {
        self.inline_disables
            .get(&line)
            .is_some_and(|disable| disable.rules.is_empty() || disable.rules.contains(rule_id))
    }

    /// Get the source line (1-based)
    pub fn get_source_line(&self, line: usize) -> Option<String> {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .map(|s| s.to_string())
    }
}

fn lower(node: roxmltree::Node) -> Option<Node> {
    if node.is_text() {
        return Some(Node::new(NodeKind::MarkupText, node.range()));
    }
    if !node.is_element() {
        return None;
    }

    let mut element = Node::new(
        NodeKind::Element {
            name: qualified_name(node, node.tag_name().namespace(), node.tag_name().name()),
        },
        node.range(),
    );

    for attr in node.attributes() {
        // Widen the value range to take in its delimiters
        let value = attr.range_value();
        let literal = Node::new(NodeKind::StringLiteral, value.start.saturating_sub(1)..value.end + 1);
        element.push(
            Node::new(
                NodeKind::Attribute {
                    name: qualified_name(node, attr.namespace(), attr.name()),
                },
                attr.range_qname().start..value.end + 1,
            )
            .with_children(vec![literal]),
        );
    }

    element.children.extend(node.children().filter_map(lower));
    Some(element)
}

/// `prefix:local` for names bound to a prefixed namespace, `local` otherwise
fn qualified_name(node: roxmltree::Node, namespace: Option<&str>, local: &str) -> String {
    match namespace
        .and_then(|uri| node.lookup_prefix(uri))
        .filter(|prefix| !prefix.is_empty())
    {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}
