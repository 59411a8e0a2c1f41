//! Diagnostic types for lint results

use crate::ast::Span;
use std::path::PathBuf;
use std::str::FromStr;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Informational hint
    #[default]
    Info,
    /// Warning - potential issue
    Warning,
    /// Error - definite problem
    Error,
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" | "hint" => Ok(Severity::Info),
            _ => Err(()),
        }
    }
}

impl Severity {
    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Get colored display name for terminal output
    pub fn colored(&self) -> String {
        format!("{}{}\x1b[0m", self.color(), self.as_str())
    }

    /// ANSI escape sequence for this severity
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Info => "\x1b[1;36m",
        }
    }
}

/// Source location in a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Length of the span (in characters)
    pub length: usize,
}

impl Location {
    /// Compute the location of `span` within `source`
    pub fn from_span(file: impl Into<PathBuf>, source: &str, span: Span) -> Self {
        let start = span.start.min(source.len());
        let before = &source[..start];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);

        Self {
            file: file.into(),
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
            length: source
                .get(span.range())
                .map_or(0, |text| text.lines().next().unwrap_or("").chars().count()),
        }
    }
}

/// A lint diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Short message
    pub message: String,
    /// Detailed help text
    pub help: Option<String>,
    /// Source location
    pub location: Location,
    /// Byte range of the offending node
    pub span: Span,
    /// Type of the offending node
    pub node_type: &'static str,
    /// The source line content
    pub source_line: Option<String>,
    /// Suggested fix
    pub fix: Option<Fix>,
}

/// A suggested fix for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// Description of what the fix does
    pub description: String,
    /// Byte range to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
        span: Span,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            help: None,
            location,
            span,
            node_type: "",
            source_line: None,
            fix: None,
        }
    }

    /// Set the node type
    pub fn with_node_type(mut self, node_type: &'static str) -> Self {
        self.node_type = node_type;
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add source line
    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }

    /// Add a fix replacing this diagnostic's span
    pub fn with_fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.fix = Some(Fix {
            description: description.into(),
            span: self.span,
            replacement: replacement.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("hint".parse::<Severity>(), Ok(Severity::Info));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.as_str(), "error");
        assert!(Severity::Warning.colored().contains("warning"));
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_location_from_span() {
        let source = "<p>\n  <q>It's</q>\n</p>";
        let start = source.find("It's").unwrap();
        let loc = Location::from_span("page.xml", source, Span::new(start, start + 4));

        assert_eq!(loc.file, PathBuf::from("page.xml"));
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 6);
        assert_eq!(loc.length, 4);
    }

    #[test]
    fn test_location_counts_characters() {
        let source = "“x” 'y'";
        let start = source.find('\'').unwrap();
        let loc = Location::from_span("a.txt", source, Span::new(start, start + 3));
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.length, 3);
    }

    #[test]
    fn test_location_multiline_span_length() {
        let source = "\"first\nsecond\"";
        let loc = Location::from_span("a.txt", source, Span::new(0, source.len()));
        assert_eq!(loc.length, 6);
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let span = Span::new(3, 9);
        let diag = Diagnostic::new(
            "no-straight-quotes",
            Severity::Warning,
            "message",
            Location::default(),
            span,
        )
        .with_node_type("Literal")
        .with_help("help text")
        .with_source_line("source line")
        .with_fix("Replace with curly quotes", "“x”");

        assert_eq!(diag.rule_id, "no-straight-quotes");
        assert_eq!(diag.node_type, "Literal");
        assert_eq!(diag.help.as_deref(), Some("help text"));
        assert_eq!(diag.source_line.as_deref(), Some("source line"));

        let fix = diag.fix.unwrap();
        assert_eq!(fix.span, span);
        assert_eq!(fix.replacement, "“x”");
    }

    #[test]
    fn test_diagnostic_without_fix() {
        let diag = Diagnostic::new("id", Severity::Info, "msg", Location::default(), Span::default());
        assert!(diag.fix.is_none());
        assert!(diag.help.is_none());
    }
}
