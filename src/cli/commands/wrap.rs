use anyhow::Result;

use super::super::args::WrapCommand;
use super::{
    CommandResult, CommandSummary, WrapSummary,
    helper::{CommandContext, finish},
};
use crate::core::manifest::Manifest;
use crate::core::pipeline::{Pipeline, WriteMode};

pub fn wrap(cmd: WrapCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let mode = if cmd.apply {
        WriteMode::Apply
    } else {
        WriteMode::DryRun
    };

    let mut manifest = Manifest::open_or_create(&ctx.manifest_path)?;
    let pipeline = Pipeline::new(ctx.config);
    let report = pipeline.run(&ctx.files, Some(&mut manifest), mode);

    let pending = mode == WriteMode::DryRun && report.translated > 0;
    let summary = WrapSummary {
        is_apply: cmd.apply,
        translated: report.translated,
        skipped: report.skipped,
        cjk_comments: report.cjk_comments,
        manifest_path: ctx.manifest_path,
        manifest_added: report.manifest_added,
        cancelled: report.cancelled,
        files: report.files,
    };

    Ok(finish(
        CommandSummary::Wrap(summary),
        report.issues,
        report.files_scanned,
        pending,
    ))
}
