//! curly-quotes: a linter that enforces typographic quotes
//!
//! Finds straight quotes (`'` and `"`) in user-facing strings and text and
//! rewrites them into curly quotes and apostrophes. The rule runs over a small
//! syntax tree ([`ast`]) so any frontend can feed it; the bundled frontend
//! handles XML-based markup (XHTML, SVG, XML).

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod fixer;
pub mod output;
pub mod parser;
pub mod quotes;
pub mod ranges;
pub mod rules;

pub use ast::{Node, NodeKind, Span};
pub use config::{CliOptions, Config, ConfigError, RuleOptions};
pub use diagnostics::{Diagnostic, Fix, Location, Severity};
pub use engine::{FixReport, LintEngine, LintError, LintStatistics};
pub use parser::{MarkupDocument, ParseError};
pub use quotes::{QuoteFamily, QuoteStyle};
pub use ranges::{IgnoredRange, UnresolvableSpan};
pub use rules::NoStraightQuotes;
