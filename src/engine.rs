//! Lint engine - runs the rule over documents and applies its fixes

use crate::ast::Node;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Location};
use crate::fixer::apply_fixes;
use crate::parser::{MarkupDocument, ParseError};
use crate::rules::{NoStraightQuotes, Violation};
use crate::Severity;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Upper bound on lint-and-fix rounds for a single document
pub const MAX_FIX_PASSES: usize = 10;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Failed to parse file: {0}")]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Statistics about lint results
#[derive(Debug, Default, Clone)]
pub struct LintStatistics {
    /// Count per severity
    pub per_severity: HashMap<Severity, usize>,
    /// Total files linted
    pub files_linted: usize,
    /// Files with at least one diagnostic
    pub files_with_errors: usize,
    /// Fixes written back
    pub fixes_applied: usize,
}

impl LintStatistics {
    /// Record a diagnostic
    pub fn record(&mut self, diagnostic: &Diagnostic) {
        *self.per_severity.entry(diagnostic.severity).or_insert(0) += 1;
    }

    /// Merge another statistics into this one
    pub fn merge(&mut self, other: &LintStatistics) {
        for (severity, count) in &other.per_severity {
            *self.per_severity.entry(*severity).or_insert(0) += count;
        }
        self.files_linted += other.files_linted;
        self.files_with_errors += other.files_with_errors;
        self.fixes_applied += other.fixes_applied;
    }

    /// Diagnostics recorded across all severities
    pub fn problem_count(&self) -> usize {
        self.per_severity.values().sum()
    }

    pub fn error_count(&self) -> usize {
        self.per_severity.get(&Severity::Error).copied().unwrap_or(0)
    }

    pub fn warning_count(&self) -> usize {
        self.per_severity.get(&Severity::Warning).copied().unwrap_or(0)
    }

    pub fn info_count(&self) -> usize {
        self.per_severity.get(&Severity::Info).copied().unwrap_or(0)
    }
}

/// Result of fixing a document
#[derive(Debug, Default)]
pub struct FixReport {
    /// Source after all applied fixes
    pub output: String,
    /// Number of fixes applied over all passes
    pub applied: usize,
    /// Diagnostics still present in `output`
    pub remaining: Vec<Diagnostic>,
}

/// The main lint engine
pub struct LintEngine {
    rule: NoStraightQuotes,
    config: Config,
}

impl LintEngine {
    pub fn new(config: Config) -> Self {
        Self {
            rule: NoStraightQuotes::new(config.options.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lint a syntax tree produced by any frontend for `source`
    pub fn lint_tree(&self, source: &str, root: &Node, path: &Path) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .rule
            .check(source, root)
            .into_iter()
            .map(|violation| self.to_diagnostic(source, path, violation))
            .collect();

        // Sort diagnostics by location
        diagnostics.sort_by(|a, b| {
            a.location
                .line
                .cmp(&b.location.line)
                .then_with(|| a.location.column.cmp(&b.location.column))
        });

        diagnostics
    }

    /// Lint a parsed markup document, honouring its inline disable comments
    pub fn lint_document(&self, doc: &MarkupDocument, path: &Path) -> Vec<Diagnostic> {
        let mut diagnostics = self.lint_tree(&doc.source, &doc.root, path);
        diagnostics.retain(|d| {
            let disabled = doc.is_rule_disabled_at_line(&d.rule_id, d.location.line);
            if disabled {
                debug!("{}:{} disabled by inline comment", path.display(), d.location.line);
            }
            !disabled
        });
        diagnostics
    }

    /// Lint markup source text
    pub fn lint_source(&self, source: &str, path: &Path) -> Result<Vec<Diagnostic>, LintError> {
        let doc = MarkupDocument::parse_str(source)?;
        Ok(self.lint_document(&doc, path))
    }

    /// Lint a file and return diagnostics
    pub fn lint_file(&self, path: &Path) -> Result<Vec<Diagnostic>, LintError> {
        if !self.config.should_lint(path) {
            debug!("skipping excluded file {}", path.display());
            return Ok(Vec::new());
        }

        let doc = MarkupDocument::parse_file(path)?;
        Ok(self.lint_document(&doc, path))
    }

    /// Fix a document, re-linting until no fixable diagnostic is left
    pub fn fix_document(&self, doc: &MarkupDocument, path: &Path) -> Result<FixReport, LintError> {
        let mut output = doc.source.clone();
        let mut diagnostics = self.lint_document(doc, path);
        let mut applied = 0;

        for pass in 1..=MAX_FIX_PASSES {
            if !diagnostics.iter().any(|d| d.fix.is_some()) {
                break;
            }

            let outcome = apply_fixes(&output, &diagnostics);
            if outcome.applied == 0 {
                break;
            }
            debug!(
                "{}: pass {pass} applied {} fixes, deferred {}",
                path.display(),
                outcome.applied,
                outcome.skipped
            );

            applied += outcome.applied;
            output = outcome.output;
            diagnostics = self.lint_document(&MarkupDocument::parse_str(&output)?, path);

            if pass == MAX_FIX_PASSES && diagnostics.iter().any(|d| d.fix.is_some()) {
                warn!(
                    "{}: fixes still pending after {MAX_FIX_PASSES} passes",
                    path.display()
                );
            }
        }

        Ok(FixReport {
            output,
            applied,
            remaining: diagnostics,
        })
    }

    /// Fix a file in place
    ///
    /// Excluded files are left untouched and yield an empty report.
    pub fn fix_file(&self, path: &Path) -> Result<FixReport, LintError> {
        if !self.config.should_lint(path) {
            debug!("skipping excluded file {}", path.display());
            return Ok(FixReport::default());
        }

        let doc = MarkupDocument::parse_file(path)?;
        let report = self.fix_document(&doc, path)?;
        if report.applied > 0 {
            fs::write(path, &report.output)?;
        }
        Ok(report)
    }

    fn to_diagnostic(&self, source: &str, path: &Path, violation: Violation) -> Diagnostic {
        let location = Location::from_span(path, source, violation.span);
        let source_line = source.lines().nth(location.line.saturating_sub(1));

        let mut diagnostic = Diagnostic::new(
            NoStraightQuotes::ID,
            self.config.severity,
            NoStraightQuotes::MESSAGE,
            location,
            violation.span,
        )
        .with_node_type(violation.node_type)
        .with_help(NoStraightQuotes::DESCRIPTION);

        if let Some(line) = source_line {
            diagnostic = diagnostic.with_source_line(line);
        }
        if let Some(replacement) = violation.fix {
            diagnostic = diagnostic.with_fix(NoStraightQuotes::FIX_DESCRIPTION, replacement);
        }

        diagnostic
    }
}
