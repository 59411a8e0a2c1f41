//! `no-straight-quotes`: enforce typographic quotes in user-facing text

use super::Violation;
use crate::ast::{Node, NodeKind};
use crate::config::RuleOptions;
use crate::quotes::{contains_unignored_quote, replace_all_quotes, QuoteStyle};
use crate::ranges::{ignored_ranges, IgnoredRange};
use log::debug;

/// Finds string literals, template literals and text nodes containing
/// straight quotes.
///
/// Subtrees below an ignored element, attribute, call or object property are
/// skipped entirely, so the recursion itself plays the role of the context
/// stacks.
#[derive(Debug, Clone)]
pub struct NoStraightQuotes {
    options: RuleOptions,
    style: QuoteStyle,
}

impl Default for NoStraightQuotes {
    fn default() -> Self {
        Self::new(RuleOptions::default())
    }
}

impl NoStraightQuotes {
    pub const ID: &'static str = "no-straight-quotes";
    pub const MESSAGE: &'static str = "Prefer the use of curly quotes";
    pub const DESCRIPTION: &'static str = "Enforce the use of curly quotes";
    pub const FIX_DESCRIPTION: &'static str = "Replace straight quotes with curly quotes";

    pub fn new(options: RuleOptions) -> Self {
        let style = options.quote_style();
        Self { options, style }
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Check a whole tree parsed from `source`
    pub fn check(&self, source: &str, root: &Node) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.visit(source, root, &mut violations);
        violations
    }

    /// The ignore list entry that suppresses `kind`, if any
    fn ignored_scope<'n>(&self, kind: &'n NodeKind) -> Option<(&'static str, &'n str)> {
        let (scope, name, list) = match kind {
            NodeKind::Element { name } => ("element", name.as_str(), &self.options.ignored_elements),
            NodeKind::Attribute { name } => {
                ("attribute", name.as_str(), &self.options.ignored_attributes)
            }
            NodeKind::Call { callee: Some(callee) } | NodeKind::New { callee: Some(callee) } => {
                ("call", callee.as_str(), &self.options.ignored_function_calls)
            }
            NodeKind::Property { key: Some(key) } => {
                ("property", key.as_str(), &self.options.ignored_object_properties)
            }
            _ => return None,
        };

        list.iter().any(|ignored| ignored == name).then_some((scope, name))
    }

    fn visit(&self, source: &str, node: &Node, violations: &mut Vec<Violation>) {
        if let Some((scope, name)) = self.ignored_scope(&node.kind) {
            debug!("skipping ignored {scope} `{name}`");
            return;
        }

        match &node.kind {
            NodeKind::StringLiteral => self.handle(source, node, 1, violations),
            NodeKind::RegexLiteral => {
                if !self.options.ignored_function_calls.iter().any(|c| c == "RegExp") {
                    self.handle(source, node, 1, violations);
                }
            }
            // The raw text of a tagged template is significant to its tag
            NodeKind::TemplateLiteral { tagged: false } => self.handle(source, node, 1, violations),
            NodeKind::MarkupText => self.handle(source, node, 0, violations),
            _ => {}
        }

        for child in &node.children {
            self.visit(source, child, violations);
        }
    }

    fn handle(&self, source: &str, node: &Node, trim: usize, violations: &mut Vec<Violation>) {
        let Some(span) = node.span else {
            debug!("skipping {} without source position", node.kind.type_name());
            return;
        };
        let Some(text) = source.get(span.range()) else {
            debug!("skipping {} with span {span:?} outside the source", node.kind.type_name());
            return;
        };

        let ranges = ignored_ranges(node);
        let scanned: &[IgnoredRange] = ranges.as_deref().unwrap_or(&[]);
        if !contains_unignored_quote(text, trim, scanned) {
            return;
        }

        let fix = match &ranges {
            Ok(ranges) => Some(replace_all_quotes(text, trim, &self.style, ranges)),
            Err(err) => {
                debug!("reporting {span:?} without a fix: {err}");
                None
            }
        };

        violations.push(Violation {
            span,
            node_type: node.kind.type_name(),
            fix,
        });
    }
}
