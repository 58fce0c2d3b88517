use std::path::PathBuf;

use crate::core::pipeline::FileOutcome;
use crate::core::walk::SkipCounts;
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Wrap(WrapSummary),
    Check,
    Init(InitSummary),
}

#[derive(Debug)]
pub struct WrapSummary {
    pub is_apply: bool,
    /// Files with at least one rewrite, in path order.
    pub files: Vec<FileOutcome>,
    pub translated: usize,
    pub skipped: SkipCounts,
    pub cjk_comments: usize,
    pub manifest_path: PathBuf,
    pub manifest_added: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running a zhwrap command
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// Work is left to do: a dry run found literals to rewrite.
    pub pending: bool,
    /// All issues found, sorted.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of source files that were processed.
    pub source_files_checked: usize,
}
