//! Applies diagnostic fixes to source text
//!
//! Fixes are applied from the end of the source towards the start so that
//! earlier spans stay valid. A fix overlapping one already accepted is left for
//! the next pass, after the source has been re-linted.

use crate::diagnostics::{Diagnostic, Fix};
use log::{debug, warn};

/// Result of one fix pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Source with the accepted fixes applied
    pub output: String,
    /// Number of fixes applied
    pub applied: usize,
    /// Number of fixes left out (overlapping or out of bounds)
    pub skipped: usize,
}

/// Apply every non-overlapping fix carried by `diagnostics`
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> FixOutcome {
    let mut fixes: Vec<&Fix> = diagnostics.iter().filter_map(|d| d.fix.as_ref()).collect();
    fixes.sort_by_key(|fix| (fix.span.start, fix.span.end));

    let mut accepted: Vec<&Fix> = Vec::with_capacity(fixes.len());
    let mut skipped = 0;

    for fix in fixes {
        let span = fix.span;
        if span.start > span.end
            || span.end > source.len()
            || !source.is_char_boundary(span.start)
            || !source.is_char_boundary(span.end)
        {
            warn!("dropping fix with invalid span {span:?}");
            skipped += 1;
            continue;
        }

        // Accepted spans are sorted and disjoint, so only the last can overlap
        if accepted.last().is_some_and(|prev| prev.span.overlaps(span)) {
            debug!("deferring fix at {span:?} overlapping a previous fix");
            skipped += 1;
            continue;
        }

        accepted.push(fix);
    }

    let mut output = source.to_string();
    for fix in accepted.iter().rev() {
        output.replace_range(fix.span.range(), &fix.replacement);
    }

    FixOutcome {
        output,
        applied: accepted.len(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::diagnostics::{Location, Severity};
    use pretty_assertions::assert_eq;

    fn fixable(start: usize, end: usize, replacement: &str) -> Diagnostic {
        Diagnostic::new(
            "no-straight-quotes",
            Severity::Warning,
            "msg",
            Location::default(),
            Span::new(start, end),
        )
        .with_fix("fix", replacement)
    }

    #[test]
    fn test_apply_multiple_fixes() {
        let source = r#"a = "it's"; b = 'say "hi"';"#;
        let diagnostics = vec![
            fixable(4, 10, "\"it’s\""),
            fixable(16, 26, "'say “hi”'"),
        ];

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "a = \"it’s\"; b = 'say “hi”';");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_overlapping_fix_is_deferred() {
        let source = r#"`"${'it's'}"`"#;
        let diagnostics = vec![
            fixable(4, 10, "'it’s'"),
            fixable(0, source.len(), r#"`“${'it's'}”`"#),
        ];

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, r#"`“${'it's'}”`"#);
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_adjacent_fixes_do_not_overlap() {
        let source = "'a''b'";
        let diagnostics = vec![fixable(0, 3, "‘a’"), fixable(3, 6, "‘b’")];

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "‘a’‘b’");
        assert_eq!(outcome.applied, 2);
    }

    #[test]
    fn test_diagnostics_without_fix() {
        let source = "it's";
        let diagnostics = vec![Diagnostic::new(
            "no-straight-quotes",
            Severity::Warning,
            "msg",
            Location::default(),
            Span::new(0, 4),
        )];

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome, FixOutcome { output: source.to_string(), applied: 0, skipped: 0 });
    }

    #[test]
    fn test_invalid_span_is_skipped() {
        let source = "“x”";
        // 1 is inside the first curly quote
        let diagnostics = vec![fixable(1, 3, "y"), fixable(0, 100, "z")];

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, source);
        assert_eq!(outcome.skipped, 2);
    }
}
