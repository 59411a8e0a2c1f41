//! Output formatters for lint results

use crate::diagnostics::{Diagnostic, Severity};
use serde::Serialize;
use std::io::{self, Write};

/// Print diagnostics in human-readable text format
pub fn print_text(diagnostics: &[Diagnostic]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_text(&mut handle, diagnostics)
}

/// Write diagnostics in human-readable text format
pub fn write_text<W: Write>(out: &mut W, diagnostics: &[Diagnostic]) -> io::Result<()> {
    for diag in diagnostics {
        // Header: severity[rule-id]: message
        writeln!(
            out,
            "{}[{}]: {}",
            diag.severity.colored(),
            diag.rule_id,
            diag.message
        )?;

        // Location: --> file:line:column
        writeln!(
            out,
            "  \x1b[1;34m-->\x1b[0m {}:{}:{}",
            diag.location.file.display(),
            diag.location.line,
            diag.location.column
        )?;

        if let Some(ref source) = diag.source_line {
            let line_num = diag.location.line.to_string();
            let padding = " ".repeat(line_num.len());

            writeln!(out, "   \x1b[1;34m{padding}\x1b[0m |")?;
            writeln!(out, " \x1b[1;34m{line_num}\x1b[0m | {source}")?;

            // Underline the offending node
            let underline_padding = " ".repeat(diag.location.column.saturating_sub(1));
            let underline = "^".repeat(diag.location.length.max(1));
            writeln!(
                out,
                "   \x1b[1;34m{padding}\x1b[0m | {underline_padding}{}{underline}\x1b[0m",
                diag.severity.color()
            )?;
        }

        if let Some(ref help) = diag.help {
            writeln!(out, "   \x1b[1;34m=\x1b[0m \x1b[1mhelp\x1b[0m: {help}")?;
        }

        if let Some(ref fix) = diag.fix {
            writeln!(
                out,
                "   \x1b[1;34m=\x1b[0m \x1b[1;32mfix\x1b[0m: {} `{}`",
                fix.description, fix.replacement
            )?;
        }

        writeln!(out)?;
    }

    Ok(())
}

/// JSON output format
#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    rule_id: &'a str,
    severity: &'a str,
    message: &'a str,
    node_type: &'a str,
    file: String,
    line: usize,
    column: usize,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix<'a>>,
}

#[derive(Serialize)]
struct JsonFix<'a> {
    description: &'a str,
    start: usize,
    end: usize,
    replacement: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    fixable: usize,
    errors: usize,
    warnings: usize,
    info: usize,
}

fn json_output(diagnostics: &[Diagnostic]) -> JsonOutput<'_> {
    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();

    JsonOutput {
        diagnostics: diagnostics
            .iter()
            .map(|d| JsonDiagnostic {
                rule_id: &d.rule_id,
                severity: d.severity.as_str(),
                message: &d.message,
                node_type: d.node_type,
                file: d.location.file.display().to_string(),
                line: d.location.line,
                column: d.location.column,
                length: d.location.length,
                help: d.help.as_deref(),
                fix: d.fix.as_ref().map(|f| JsonFix {
                    description: &f.description,
                    start: f.span.start,
                    end: f.span.end,
                    replacement: &f.replacement,
                }),
            })
            .collect(),
        summary: JsonSummary {
            total: diagnostics.len(),
            fixable: diagnostics.iter().filter(|d| d.fix.is_some()).count(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            info: count(Severity::Info),
        },
    }
}

/// Print diagnostics in JSON format
pub fn print_json(diagnostics: &[Diagnostic]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &json_output(diagnostics))?;
    writeln!(handle)
}

/// Format diagnostics as a JSON string
pub fn format_json(diagnostics: &[Diagnostic]) -> String {
    serde_json::to_string_pretty(&json_output(diagnostics)).unwrap_or_default()
}
