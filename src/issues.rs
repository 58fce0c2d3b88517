//! Issue types reported by the rewriter.
//!
//! Each issue is self-contained: it carries the location and text needed to
//! print it, so the reporter never goes back to the source file.

use enum_dispatch::enum_dispatch;

use crate::core::SourceContext;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Untranslated,
    KeyCollision,
    UnsupportedContext,
    ParseError,
    FileError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Untranslated => write!(f, "untranslated"),
            Rule::KeyCollision => write!(f, "key-collision"),
            Rule::UnsupportedContext => write!(f, "unsupported-context"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::FileError => write!(f, "file-error"),
        }
    }
}

// ============================================================
// Issue Types - Source Code (SourceContext)
// ============================================================

/// Chinese text that is not wrapped in a translation call yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntranslatedTextIssue {
    pub context: SourceContext,
    /// The literal as written in the source.
    pub text: String,
    /// The call it would be rewritten to.
    pub replacement: String,
}

impl UntranslatedTextIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Untranslated
    }
}

/// No key could be assigned; the literal was left as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollisionIssue {
    pub context: SourceContext,
    pub error: String,
}

impl KeyCollisionIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::KeyCollision
    }
}

/// Chinese text in a position the rewriter does not handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedContextIssue {
    pub context: SourceContext,
    pub text: String,
    /// Syntactic position, e.g. "tagged template".
    pub position: &'static str,
}

impl UnsupportedContextIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnsupportedContext
    }
}

// ============================================================
// Special Issue Types
// ============================================================

/// File could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// File could not be read, rewritten or written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl FileErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::FileError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// An issue found while rewriting.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Untranslated(UntranslatedTextIssue),
    KeyCollision(KeyCollisionIssue),
    UnsupportedContext(UnsupportedContextIssue),
    ParseError(ParseErrorIssue),
    FileError(FileErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only, no line context.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards calls on
/// `Issue` without dynamic dispatch.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for UntranslatedTextIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("run `zhwrap wrap --apply` to rewrite it")
    }

    fn details(&self) -> Option<String> {
        Some(format!("would become {}", self.replacement))
    }
}

impl Report for KeyCollisionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("increase `slugMaxLength` or rename conflicting manifest keys")
    }
}

impl Report for UnsupportedContextIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("left untouched inside {}", self.position))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for FileErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => &ctx.location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_position(&self) -> (usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.location.line, ctx.location.col),
            ReportLocation::File { .. } => (0, 0),
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.sort_file_path()
            .cmp(other.sort_file_path())
            .then_with(|| self.sort_position().cmp(&other.sort_position()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use crate::core::SourceLocation;
    use crate::issues::*;

    fn context(path: &str, line: usize, col: usize, source_line: &str) -> SourceContext {
        SourceContext::new(SourceLocation::new(path, line, col), source_line)
    }

    #[test]
    fn test_untranslated_issue() {
        let issue = Issue::from(UntranslatedTextIssue {
            context: context("src/app.tsx", 3, 11, "const a = '你好';"),
            text: "'你好'".to_string(),
            replacement: "t('ni_hao')".to_string(),
        });

        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(issue.rule(), Rule::Untranslated);
        assert_eq!(issue.message(), "'你好'");
        assert_eq!(issue.details().as_deref(), Some("would become t('ni_hao')"));
        assert!(issue.hint().is_some());
    }

    #[test]
    fn test_unsupported_context_issue_is_warning() {
        let issue = Issue::from(UnsupportedContextIssue {
            context: context("src/a.ts", 1, 1, "'提示';"),
            text: "提示".to_string(),
            position: "expression statement",
        });

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(
            issue.details().as_deref(),
            Some("left untouched inside expression statement")
        );
    }

    #[test]
    fn test_file_level_issues() {
        let issue = Issue::from(ParseErrorIssue {
            file_path: "src/broken.ts".to_string(),
            error: "Expected ';'".to_string(),
        });
        assert!(matches!(
            issue.location(),
            ReportLocation::File {
                path: "src/broken.ts"
            }
        ));
        assert_eq!(issue.rule(), Rule::ParseError);

        let issue = Issue::from(FileErrorIssue {
            file_path: "src/locked.ts".to_string(),
            error: "permission denied".to_string(),
        });
        assert_eq!(issue.rule(), Rule::FileError);
        assert_eq!(issue.severity(), Severity::Error);
    }

    #[test]
    fn test_issue_ordering() {
        let late = Issue::from(UntranslatedTextIssue {
            context: context("src/a.ts", 10, 1, ""),
            text: "'乙'".to_string(),
            replacement: "t('yi')".to_string(),
        });
        let early = Issue::from(UntranslatedTextIssue {
            context: context("src/a.ts", 2, 5, ""),
            text: "'甲'".to_string(),
            replacement: "t('jia')".to_string(),
        });
        let file = Issue::from(ParseErrorIssue {
            file_path: "src/a.ts".to_string(),
            error: "bad".to_string(),
        });
        let other = Issue::from(ParseErrorIssue {
            file_path: "src/0.ts".to_string(),
            error: "bad".to_string(),
        });

        let mut issues = vec![late.clone(), early.clone(), file.clone(), other.clone()];
        issues.sort();
        assert_eq!(issues, vec![other, file, early, late]);
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::Untranslated.to_string(), "untranslated");
        assert_eq!(Rule::KeyCollision.to_string(), "key-collision");
        assert_eq!(Rule::UnsupportedContext.to_string(), "unsupported-context");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
