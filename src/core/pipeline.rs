//! Batch driver: plans every file, assigns keys, renders and writes.
//!
//! 1. Read, parse and plan all files in parallel (read-only).
//! 2. Seed and fill the registry sequentially, in path order then source
//!    order, so keys do not depend on thread scheduling.
//! 3. Render, inject and apply edits in parallel, writing each file
//!    atomically when applying.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::Config;
use crate::core::RewriteError;
use crate::core::file_scanner::SourceFile;
use crate::core::inject::{InjectOptions, injection_edits};
use crate::core::keys::KeyRegistry;
use crate::core::manifest::{Manifest, write_atomic};
use crate::core::parsers::parse_source;
use crate::core::rewrite::{RewritePreview, apply_edits, render_plan};
use crate::core::walk::{FilePlan, SkipCounts, WalkOptions, plan_file};
use crate::issues::{
    FileErrorIssue, Issue, KeyCollisionIssue, ParseErrorIssue, UnsupportedContextIssue,
};

/// Whether rewritten files and the manifest are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    DryRun,
    Apply,
}

/// A file after planning, before keys are assigned.
struct PlannedFile {
    file: SourceFile,
    code: String,
    plan: FilePlan,
    cjk_comments: usize,
}

/// One file's rewrite.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_path: String,
    pub translated: usize,
    pub previews: Vec<RewritePreview>,
    /// The file was written back (always false in a dry run).
    pub written: bool,
}

/// Result of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files with at least one rewrite, in path order.
    pub files: Vec<FileOutcome>,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub translated: usize,
    pub skipped: SkipCounts,
    /// Comments containing Chinese, which are never rewritten.
    pub cjk_comments: usize,
    pub issues: Vec<Issue>,
    /// Manifest entries from this run, in registration order.
    pub manifest_entries: Vec<(String, String)>,
    /// Entries not yet present in the manifest.
    pub manifest_added: usize,
    /// The batch stopped early on request.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn files_changed(&self) -> usize {
        self.files.len()
    }
}

/// Rewritten text of a single source.
#[derive(Debug)]
pub struct RewrittenSource {
    pub code: String,
    pub translated: usize,
    pub entries: Vec<(String, String)>,
    pub previews: Vec<RewritePreview>,
}

pub struct Pipeline {
    config: Config,
    walk: WalkOptions,
    inject: InjectOptions,
    cancel: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            walk: WalkOptions::from_config(&config),
            inject: InjectOptions::from_config(&config),
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set to stop the batch before the next file is written.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn new_registry(&self) -> KeyRegistry {
        KeyRegistry::new(self.config.slug_max_length)
    }

    /// Rewrite a set of files.
    ///
    /// `manifest` seeds the registry when `persistExistingKeys` is set and,
    /// in apply mode, receives the new entries and is saved.
    pub fn run(
        &self,
        files: &[SourceFile],
        manifest: Option<&mut Manifest>,
        mode: WriteMode,
    ) -> BatchReport {
        let mut report = BatchReport {
            files_scanned: files.len(),
            ..Default::default()
        };

        let planned: Vec<Result<PlannedFile, (String, RewriteError)>> = files
            .par_iter()
            .map(|file| {
                self.plan_one(file)
                    .map_err(|error| (file.display.clone(), error))
            })
            .collect();

        let mut ready = Vec::with_capacity(planned.len());
        for result in planned {
            match result {
                Ok(file) => ready.push(file),
                Err((path, error)) => {
                    warn!(file = %path, %error, "file skipped");
                    report.files_failed += 1;
                    report.issues.push(file_issue(path, &error));
                }
            }
        }

        let registry = self.new_registry();
        if self.config.persist_existing_keys
            && let Some(manifest) = manifest.as_deref()
        {
            registry.seed_manifest(manifest.entries(), &self.config.known_namespaces());
        }
        for file in &ready {
            self.register(&registry, &file.plan);
        }
        debug!(keys = registry.len(), "registry filled");
        let listed = listed_keys(&registry);

        let rendered: Vec<_> = ready
            .par_iter()
            .map(|file| (file, self.finish_file(file, &registry, mode)))
            .collect();

        let mut seen_keys = HashSet::new();
        for (file, result) in rendered {
            report.skipped.add(&file.plan.skipped);
            report.cjk_comments += file.cjk_comments;
            for unsupported in &file.plan.unsupported {
                debug!(error = %unsupported.to_error(), "left untouched");
                report
                    .issues
                    .push(Issue::from(UnsupportedContextIssue {
                        context: unsupported.context.clone(),
                        text: unsupported.text.clone(),
                        position: unsupported.reason,
                    }));
            }

            match result {
                FileResult::Done {
                    outcome,
                    entries,
                    failures,
                } => {
                    report.issues.extend(failures);
                    if outcome.translated > 0 {
                        report.translated += outcome.translated;
                        report.files.push(outcome);
                    }
                    for (key, text) in entries {
                        if listed.contains(&key) && seen_keys.insert(key.clone()) {
                            report.manifest_entries.push((key, text));
                        }
                    }
                }
                FileResult::Failed(error) => {
                    warn!(file = %file.file.display, %error, "file not written");
                    report.files_failed += 1;
                    report
                        .issues
                        .push(file_issue(file.file.display.clone(), &error));
                }
                FileResult::Cancelled => report.cancelled = true,
            }
        }

        if let Some(manifest) = manifest {
            let new_entries = report
                .manifest_entries
                .iter()
                .filter(|(key, _)| manifest.get(key).is_none())
                .count();
            report.manifest_added = new_entries;
            if mode == WriteMode::Apply {
                manifest.merge(
                    report
                        .manifest_entries
                        .iter()
                        .map(|(key, text)| (key.as_str(), text.as_str())),
                );
                if new_entries > 0
                    && let Err(error) = manifest.save()
                {
                    report.issues.push(Issue::from(FileErrorIssue {
                        file_path: manifest.path().display().to_string(),
                        error: format!("{error:#}"),
                    }));
                }
            }
        }

        report.issues.sort();
        report
    }

    /// Rewrite one in-memory source with its own registry state.
    pub fn rewrite_source(
        &self,
        code: &str,
        file_path: &str,
        registry: &KeyRegistry,
    ) -> Result<RewrittenSource, RewriteError> {
        let source = parse_source(code.to_string(), file_path)?;
        let plan = plan_file(&source, self.config.namespace_for(file_path), &self.walk)?;
        self.register(registry, &plan);

        let rendered = render_plan(&plan, code, registry, &self.config.translation_call_name);
        let mut edits = rendered.edits.clone();
        edits.extend(injection_edits(&plan, &rendered, &self.inject));
        let listed = listed_keys(registry);
        Ok(RewrittenSource {
            code: apply_edits(code, edits)?,
            translated: rendered.translated,
            entries: rendered
                .entries
                .into_iter()
                .filter(|(key, _)| listed.contains(key))
                .collect(),
            previews: rendered.previews,
        })
    }

    fn plan_one(&self, file: &SourceFile) -> Result<PlannedFile, RewriteError> {
        let code = fs::read_to_string(&file.path)
            .map_err(|e| RewriteError::io(file.display.clone(), e))?;
        let source = parse_source(code, &file.display)?;
        let namespace = self.config.namespace_for(&file.display);
        let plan = plan_file(&source, namespace, &self.walk)?;
        debug!(
            file = %file.display,
            rewrites = plan.rewrites.len(),
            skipped = plan.skipped.total(),
            "planned"
        );
        Ok(PlannedFile {
            file: file.clone(),
            cjk_comments: source.cjk_comment_count,
            code: source.code,
            plan,
        })
    }

    /// Claims and registrations for one plan: wrapped calls first, then new texts.
    fn register(&self, registry: &KeyRegistry, plan: &FilePlan) {
        for wrapped in &plan.wrapped {
            if wrapped.is_text && self.config.persist_existing_keys {
                registry.register_wrapped(&plan.namespace, &wrapped.text);
            } else {
                registry.claim(&wrapped.text);
            }
        }
        for text in plan.texts() {
            // Failures surface again, with a location, when rendering
            if let Err(error) = registry.resolve(&plan.namespace, text) {
                debug!(%error, "key assignment deferred");
            }
        }
    }

    fn finish_file(
        &self,
        file: &PlannedFile,
        registry: &KeyRegistry,
        mode: WriteMode,
    ) -> FileResult {
        let rendered = render_plan(
            &file.plan,
            &file.code,
            registry,
            &self.config.translation_call_name,
        );
        let failures = rendered
            .failures
            .iter()
            .map(|failure| {
                Issue::from(KeyCollisionIssue {
                    context: failure.context.clone(),
                    error: failure.error.to_string(),
                })
            })
            .collect();

        let mut edits = rendered.edits.clone();
        edits.extend(injection_edits(&file.plan, &rendered, &self.inject));
        let code = match apply_edits(&file.code, edits) {
            Ok(code) => code,
            Err(error) => return FileResult::Failed(error),
        };

        let changed = code != file.code;
        let mut written = false;
        if changed && mode == WriteMode::Apply {
            if self.is_cancelled() {
                return FileResult::Cancelled;
            }
            if let Err(error) = write_atomic(&file.file.path, &code) {
                return FileResult::Failed(RewriteError::io(
                    file.file.display.clone(),
                    std::io::Error::other(format!("{error:#}")),
                ));
            }
            written = true;
            debug!(file = %file.file.display, "written");
        }

        FileResult::Done {
            outcome: FileOutcome {
                file_path: file.file.display.clone(),
                translated: rendered.translated,
                previews: rendered.previews,
                written,
            },
            entries: rendered.entries,
            failures,
        }
    }
}

enum FileResult {
    Done {
        outcome: FileOutcome,
        entries: Vec<(String, String)>,
        failures: Vec<Issue>,
    },
    Failed(RewriteError),
    Cancelled,
}

/// Keys that belong in the manifest. Texts used as their own key by
/// existing calls are left out.
fn listed_keys(registry: &KeyRegistry) -> HashSet<String> {
    registry.manifest().into_iter().map(|(key, _)| key).collect()
}

fn file_issue(file_path: String, error: &RewriteError) -> Issue {
    match error {
        RewriteError::ParseFailure { .. } => Issue::from(ParseErrorIssue {
            file_path,
            error: error.to_string(),
        }),
        _ => Issue::from(FileErrorIssue {
            file_path,
            error: error.to_string(),
        }),
    }
}
