//! curly-quotes CLI entry point

use clap::Parser;
use curly_quotes::{
    output, CliOptions, Config, Diagnostic, LintEngine, LintError, LintStatistics, MarkupDocument,
    Severity,
};
use log::{debug, warn};
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const STDIN: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "curly-quotes")]
#[command(author, version, about = "Enforce curly quotes in markup files", long_about = None)]
struct Cli {
    /// Files or glob patterns to lint. Use "-" for stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Rewrite files in place (stdin is written to stdout)
    #[arg(long)]
    fix: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Config file path (default: auto-detect .curlyquotesrc.json)
    #[arg(short, long, env = "CURLY_QUOTES_CONFIG")]
    config: Option<PathBuf>,

    /// Severity to report straight quotes with
    #[arg(short, long, value_enum)]
    severity: Option<SeverityArg>,

    /// Only output errors
    #[arg(short, long)]
    quiet: bool,

    /// Only show the number of problems
    #[arg(long)]
    count: bool,

    /// Show statistics at the end
    #[arg(long)]
    statistics: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Exclude files matching pattern (can be used multiple times)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Only lint files matching pattern (can be used multiple times)
    #[arg(long = "filename", value_name = "PATTERN")]
    filename: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SeverityArg {
    Error,
    Warning,
    Info,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Error => Severity::Error,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Info => Severity::Info,
        }
    }
}

/// Outcome of linting (and possibly fixing) one input
struct FileReport {
    diagnostics: Vec<Diagnostic>,
    fixes_applied: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path).into_diagnostic()?
    } else {
        let start_dir = std::env::current_dir().into_diagnostic()?;
        match Config::find_and_load(&start_dir) {
            Ok(Some((path, cfg))) => {
                debug!("using config {}", path.display());
                cfg
            }
            Ok(None) => Config::default(),
            Err(e) => {
                warn!("failed to load config: {e}");
                Config::default()
            }
        }
    };

    config
        .merge_cli(CliOptions {
            severity: cli.severity.map(Severity::from),
            exclude: cli.exclude.clone(),
            filename: cli.filename.clone(),
            verbose: cli.verbose,
            statistics: cli.statistics,
            jobs: cli.jobs,
        })
        .into_diagnostic()?;

    let files = collect_files(&cli.files, &config)?;
    if files.is_empty() {
        eprintln!("No files to lint");
        return Ok(ExitCode::from(0));
    }

    let jobs = config.jobs;
    let engine = LintEngine::new(config);
    let lint = |file: &PathBuf| (file.clone(), process_file(file, &engine, cli.fix));

    let results: Vec<(PathBuf, std::result::Result<FileReport, LintError>)> = if jobs == 1 {
        files.iter().map(lint).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .into_diagnostic()?;
        pool.install(|| files.par_iter().map(lint).collect())
    };

    let mut all_diags = Vec::new();
    let mut stats = LintStatistics::default();
    let mut failures = 0;

    for (path, result) in results {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Failed to lint {}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        let mut diagnostics = report.diagnostics;
        if cli.quiet {
            diagnostics.retain(|d| d.severity == Severity::Error);
        }

        stats.files_linted += 1;
        stats.fixes_applied += report.fixes_applied;
        if !diagnostics.is_empty() {
            stats.files_with_errors += 1;
        }
        for d in &diagnostics {
            stats.record(d);
        }
        all_diags.extend(diagnostics);
    }

    if cli.count {
        println!("{}", all_diags.len());
        return Ok(exit_code(&stats, failures));
    }

    match cli.format {
        OutputFormat::Text => output::print_text(&all_diags).into_diagnostic()?,
        OutputFormat::Json => output::print_json(&all_diags).into_diagnostic()?,
    }

    if cli.statistics {
        print_statistics(&stats);
    }

    if !cli.quiet {
        print_summary(&stats, cli.fix);
    }

    Ok(exit_code(&stats, failures))
}

/// Expand glob patterns and drop excluded files
fn collect_files(patterns: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern_str = pattern.to_string_lossy();

        if pattern_str == STDIN {
            files.push(PathBuf::from(STDIN));
            continue;
        }

        if pattern_str.contains(['*', '?', '[']) {
            for entry in glob::glob(&pattern_str).into_diagnostic()? {
                let path = entry.into_diagnostic()?;
                if path.is_file() && config.should_lint(&path) {
                    files.push(path);
                }
            }
        } else if config.should_lint(pattern) {
            files.push(pattern.clone());
        } else {
            debug!("excluded {}", pattern.display());
        }
    }

    Ok(files)
}

fn process_file(file: &Path, engine: &LintEngine, fix: bool) -> std::result::Result<FileReport, LintError> {
    if file.as_os_str() != STDIN {
        return if fix {
            let report = engine.fix_file(file)?;
            Ok(FileReport {
                diagnostics: report.remaining,
                fixes_applied: report.applied,
            })
        } else {
            Ok(FileReport {
                diagnostics: engine.lint_file(file)?,
                fixes_applied: 0,
            })
        };
    }

    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    let doc = MarkupDocument::parse_str(&content)?;
    let name = Path::new("<stdin>");

    if fix {
        let report = engine.fix_document(&doc, name)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(report.output.as_bytes())?;
        stdout.flush()?;
        return Ok(FileReport {
            diagnostics: report.remaining,
            fixes_applied: report.applied,
        });
    }

    Ok(FileReport {
        diagnostics: engine.lint_document(&doc, name),
        fixes_applied: 0,
    })
}

fn exit_code(stats: &LintStatistics, failures: usize) -> ExitCode {
    if failures > 0 || stats.error_count() > 0 {
        ExitCode::from(2)
    } else if stats.warning_count() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::from(0)
    }
}

fn print_summary(stats: &LintStatistics, fix: bool) {
    let file_count = stats.files_linted;
    let file_word = if file_count == 1 { "file" } else { "files" };
    let error_count = stats.error_count();
    let warning_count = stats.warning_count();

    if fix && stats.fixes_applied > 0 {
        eprintln!(
            "\nFixed {} quote problem{} in {} {}",
            stats.fixes_applied,
            if stats.fixes_applied == 1 { "" } else { "s" },
            file_count,
            file_word
        );
    }

    if error_count == 0 && warning_count == 0 {
        eprintln!("\nNo issues found in {file_count} {file_word}");
    } else {
        eprintln!(
            "\nFound {} error{} and {} warning{} in {} {}",
            error_count,
            if error_count == 1 { "" } else { "s" },
            warning_count,
            if warning_count == 1 { "" } else { "s" },
            file_count,
            file_word
        );
    }
}

fn print_statistics(stats: &LintStatistics) {
    eprintln!("\n\x1b[1mStatistics:\x1b[0m");
    eprintln!("  Files linted: {}", stats.files_linted);
    eprintln!("  Files with problems: {}", stats.files_with_errors);
    eprintln!("  Fixes applied: {}", stats.fixes_applied);
    eprintln!("  Straight quote problems: {}", stats.problem_count());
    eprintln!();
    eprintln!("  \x1b[1mBy severity:\x1b[0m");
    eprintln!("    \x1b[1;31mErrors:\x1b[0m   {}", stats.error_count());
    eprintln!("    \x1b[1;33mWarnings:\x1b[0m {}", stats.warning_count());
    eprintln!("    \x1b[1;36mInfo:\x1b[0m     {}", stats.info_count());
}
