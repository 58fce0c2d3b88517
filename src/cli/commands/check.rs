use anyhow::Result;

use super::super::args::CheckCommand;
use super::{
    CommandResult, CommandSummary,
    helper::{CommandContext, finish},
};
use crate::core::manifest::Manifest;
use crate::core::pipeline::{Pipeline, WriteMode};
use crate::issues::{Issue, UntranslatedTextIssue};

/// Dry-run the rewriter and report every literal it would change.
///
/// Keys are previewed the way `wrap` would assign them, so existing manifest
/// entries are read; a dry run never saves them.
pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let mut manifest = Manifest::open_or_create(&ctx.manifest_path)?;
    let pipeline = Pipeline::new(ctx.config);
    let report = pipeline.run(&ctx.files, Some(&mut manifest), WriteMode::DryRun);

    let mut issues = report.issues;
    for file in &report.files {
        issues.extend(file.previews.iter().map(|preview| {
            Issue::from(UntranslatedTextIssue {
                context: preview.context.clone(),
                text: preview.original.clone(),
                replacement: preview.replacement.clone(),
            })
        }));
    }

    Ok(finish(CommandSummary::Check, issues, report.files_scanned, false))
}
