//! Rule definitions

mod no_straight_quotes;

pub use no_straight_quotes::NoStraightQuotes;

use crate::ast::Span;

/// A rule violation found in a syntax tree, before it is turned into a
/// located [`crate::Diagnostic`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Span of the offending node
    pub span: Span,
    /// Type name of the offending node
    pub node_type: &'static str,
    /// Replacement text for the whole span, when a safe fix exists
    pub fix: Option<String>,
}
