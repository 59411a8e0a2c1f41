//! Ignore ranges for quote scanning
//!
//! Embedded expressions of a template literal (`${...}`) are code, not text,
//! so quotes inside them must never be rewritten as part of the template.

use crate::ast::{Node, NodeKind};
use thiserror::Error;

/// Local `[start, end)` byte range inside a node's own text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IgnoredRange {
    pub start: usize,
    pub end: usize,
}

impl IgnoredRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

/// Returns true if `index` falls inside any of `ranges`
pub fn is_ignored(index: usize, ranges: &[IgnoredRange]) -> bool {
    ranges.iter().any(|range| range.contains(index))
}

/// Position data needed to compute ignore ranges is missing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnresolvableSpan {
    #[error("template literal has no source position")]
    Template,
    #[error("embedded expression {index} has no source position")]
    Expression { index: usize },
}

/// Compute the ranges of `node`'s text that quote scanning must skip.
///
/// Only template literals have any; every other node yields an empty list.
/// An error means the bounds of an embedded expression are unknown, so the
/// node can be reported but must not be rewritten.
pub fn ignored_ranges(node: &Node) -> Result<Vec<IgnoredRange>, UnresolvableSpan> {
    if !matches!(node.kind, NodeKind::TemplateLiteral { .. }) {
        return Ok(Vec::new());
    }

    let template = node.span.ok_or(UnresolvableSpan::Template)?;

    node.children
        .iter()
        .enumerate()
        .map(|(index, expression)| {
            let span = expression
                .span
                .ok_or(UnresolvableSpan::Expression { index })?;
            Ok(IgnoredRange::new(
                span.start.saturating_sub(template.start),
                span.end.saturating_sub(template.start),
            ))
        })
        .collect()
}
