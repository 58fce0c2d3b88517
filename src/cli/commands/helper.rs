use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use tracing::debug;

use super::{CommandResult, CommandSummary};
use crate::cli::args::CommonArgs;
use crate::config::{Config, load_config};
use crate::core::file_scanner::{SourceFile, scan_files};
use crate::issues::{Issue, Severity};

/// Configuration and file set shared by `wrap` and `check`.
///
/// Includes, blacklist and namespace patterns are relative to the source root.
pub struct CommandContext {
    pub config: Config,
    pub manifest_path: PathBuf,
    pub files: Vec<SourceFile>,
}

impl CommandContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let start_dir = args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if !start_dir.is_dir() {
            bail!("Source root is not a directory: {}", start_dir.display());
        }

        let loaded = load_config(&start_dir)?;
        let config = loaded.config;
        let base_dir = match (&args.source_root, &loaded.config_dir) {
            (Some(root), _) => root.clone(),
            (None, Some(config_dir)) => join_relative(config_dir, &config.source_root),
            (None, None) => join_relative(&start_dir, &config.source_root),
        };
        let manifest_path = match &args.manifest {
            Some(path) => path.clone(),
            None => join_relative(&base_dir, &config.manifest_path),
        };
        debug!(
            base_dir = %base_dir.display(),
            manifest = %manifest_path.display(),
            from_file = loaded.from_file,
            "configuration loaded"
        );

        let includes: Vec<String> = if args.paths.is_empty() {
            config.includes.clone()
        } else {
            args.paths
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect()
        };
        let scan = scan_files(
            &base_dir,
            &includes,
            &config.blacklist,
            config.ignore_test_files,
        );
        debug!(
            files = scan.files.len(),
            skipped = scan.skipped_count,
            "files scanned"
        );

        Ok(Self {
            config,
            manifest_path,
            files: scan.files,
        })
    }
}

/// Joins a config-relative path onto `base`, dropping `.` components.
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in Path::new(relative).components() {
        if component != Component::CurDir {
            path.push(component);
        }
    }
    path
}

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    source_files_checked: usize,
    pending: bool,
) -> CommandResult {
    issues.sort();

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        pending,
        issues,
        parse_error_count,
        source_files_checked,
    }
}
