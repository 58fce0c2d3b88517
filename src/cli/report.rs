//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; rewrite previews reuse the same gutter
//! layout. Kept apart from the engine so zhwrap can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, WrapSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::SourceContext;
use crate::core::rewrite::RewritePreview;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);
    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - no untranslated text found",
            source_files,
            plural(source_files, "file", "files")
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Wrap(summary) => {
            print_wrap_to(summary, result.source_files_checked, &mut stdout);
            report_to(&result.issues, &mut stdout);
        }
        CommandSummary::Check => {
            report_to(&result.issues, &mut stdout);
            if result.issues.is_empty() {
                print_success_to(result.source_files_checked, &mut stdout);
            }
        }
        CommandSummary::Init(summary) => print_init(summary),
    }

    print_parse_warning_to(result.parse_error_count, verbose, &mut io::stderr().lock());
}

// ============================================================
// Internal Functions
// ============================================================

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(ctx) => {
            let caret = match severity {
                Severity::Error => "^".red(),
                Severity::Warning => "^".yellow(),
            };
            print_source_context(ctx, writer, max_line_width, &caret.to_string());
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

/// `--> path:line:col`, the source line, and a caret under the column.
fn print_source_context<W: Write>(
    ctx: &SourceContext,
    writer: &mut W,
    max_line_width: usize,
    caret: &str,
) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        ctx.file_path(),
        ctx.line(),
        ctx.col()
    );
    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        ctx.line().to_string().blue(),
        "|".blue(),
        ctx.source_line,
        width = max_line_width
    );

    // col is 1-based, counted in chars
    let prefix: String = ctx
        .source_line
        .chars()
        .take(ctx.col().saturating_sub(1))
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret,
        width = max_line_width,
        padding = caret_padding
    );
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        plural(total_errors, "error", "errors").red(),
        total_warnings,
        plural(total_warnings, "warning", "warnings").yellow()
    );
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn print_preview<W: Write>(preview: &RewritePreview, writer: &mut W, max_line_width: usize) {
    print_source_context(
        &preview.context,
        writer,
        max_line_width,
        &"^".green().to_string(),
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {} {} {} {}",
        "",
        "=".blue(),
        "rewrite:".bold(),
        preview.original,
        "->".dimmed(),
        preview.replacement.green(),
        width = max_line_width
    );
    let _ = writeln!(writer);
}

fn print_wrap_to<W: Write>(summary: &WrapSummary, source_files: usize, writer: &mut W) {
    if !summary.is_apply {
        let max_line_width = summary
            .files
            .iter()
            .flat_map(|file| &file.previews)
            .map(|preview| preview.context.line())
            .max()
            .map(|n| n.to_string().len())
            .unwrap_or(1);
        for preview in summary.files.iter().flat_map(|file| &file.previews) {
            print_preview(preview, writer, max_line_width);
        }
    }

    let file_count = summary.files.len();
    if summary.translated == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} - nothing to rewrite",
                source_files,
                plural(source_files, "file", "files")
            )
            .green()
        );
    } else if summary.is_apply {
        let written = summary.files.iter().filter(|f| f.written).count();
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Rewrote {} {} in {} {}",
                summary.translated,
                plural(summary.translated, "literal", "literals"),
                written,
                plural(written, "file", "files")
            )
            .green()
        );
    } else {
        let _ = writeln!(
            writer,
            "Would rewrite {} {} in {} {} (use {} to write changes)",
            summary.translated,
            plural(summary.translated, "literal", "literals"),
            file_count,
            plural(file_count, "file", "files"),
            "--apply".cyan()
        );
    }

    if summary.manifest_added > 0 {
        let verb = if summary.is_apply { "Added" } else { "Would add" };
        let _ = writeln!(
            writer,
            "{} {} {} to {}",
            verb,
            summary.manifest_added,
            plural(summary.manifest_added, "key", "keys"),
            summary.manifest_path.display()
        );
    }

    let skipped = &summary.skipped;
    if skipped.total() > 0 {
        let _ = writeln!(
            writer,
            "{} {} not Chinese, {} already wrapped, {} non-translatable, {} unsupported",
            "Skipped:".dimmed(),
            skipped.not_chinese,
            skipped.already_wrapped,
            skipped.non_translatable,
            skipped.unsupported
        );
    }

    if summary.cjk_comments > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} Chinese text and {} left untouched",
            "note:".bold(),
            summary.cjk_comments,
            plural(summary.cjk_comments, "comment contains", "comments contain"),
            plural(summary.cjk_comments, "was", "were")
        );
    }

    if summary.cancelled {
        let _ = writeln!(
            writer,
            "{} cancelled before all files were written",
            "warning:".bold().yellow()
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
    }
}

// ============================================================
// Tests
// ============================================================
