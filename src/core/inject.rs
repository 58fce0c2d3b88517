//! Makes the translation function available where calls were emitted.
//!
//! Import style adds one top-of-file import. Hook style declares the
//! accessor at the top of each component or hook that received calls and
//! imports the hook once; calls outside any component fall back to the
//! module import. Existing bindings are detected by name, so a second run
//! adds nothing.

use tracing::debug;

use crate::config::{Config, ImportStyle};
use crate::core::rewrite::{RenderedFile, TextEdit};
use crate::core::walk::{BodyAnchor, FilePlan, ModuleBindings};

#[derive(Debug, Clone)]
pub struct InjectOptions {
    pub style: ImportStyle,
    pub translation_call: String,
    pub callee_root: String,
    pub import_source: String,
    pub hook_name: String,
    pub hook_source: String,
}

impl InjectOptions {
    pub fn from_config(config: &Config) -> Self {
        let translation_call = config.translation_call_name.clone();
        let callee_root = translation_call
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            style: config.import_style,
            translation_call,
            callee_root,
            import_source: config.import_source.clone(),
            hook_name: config.hook_name.clone(),
            hook_source: config.hook_source.clone(),
        }
    }

    /// `import { t } from '...'`, or a default import for dotted callees.
    fn callee_import(&self) -> String {
        if self.callee_root == self.translation_call {
            format!(
                "import {{ {} }} from '{}';",
                self.callee_root, self.import_source
            )
        } else {
            format!("import {} from '{}';", self.callee_root, self.import_source)
        }
    }

    fn hook_import(&self) -> String {
        format!(
            "import {{ {} }} from '{}';",
            self.hook_name, self.hook_source
        )
    }

    fn hook_declaration(&self) -> String {
        format!("const {{ {} }} = {}();", self.callee_root, self.hook_name)
    }
}

/// Declaration edits for a rendered file.
pub fn injection_edits(
    plan: &FilePlan,
    rendered: &RenderedFile,
    options: &InjectOptions,
) -> Vec<TextEdit> {
    if rendered.translated == 0 || plan.bindings.callee_root_bound {
        return Vec::new();
    }

    let mut edits = Vec::new();
    let mut imports = Vec::new();

    let module_access = match options.style {
        ImportStyle::Import => true,
        ImportStyle::Hook => {
            let mut hook_used = false;
            for &index in &rendered.used_scopes {
                let Some(scope) = plan.scopes.get(index) else {
                    continue;
                };
                if scope.declares_callee {
                    continue;
                }
                debug!(file = %plan.file_path, scope = %scope.name, "injecting hook");
                hook_used = true;
                edits.extend(hook_edits(&scope.anchor, &options.hook_declaration()));
            }
            if hook_used && !plan.bindings.hook_bound {
                imports.push(options.hook_import());
            }
            rendered.needs_module_access
        }
    };

    if module_access {
        imports.insert(0, options.callee_import());
    }

    if !imports.is_empty() {
        edits.push(import_edit(&plan.bindings, &imports));
    }
    edits
}

fn hook_edits(anchor: &BodyAnchor, declaration: &str) -> Vec<TextEdit> {
    match anchor {
        BodyAnchor::Block {
            after_brace,
            indent,
            inline_first: None,
        } => vec![TextEdit::insert(
            *after_brace,
            format!("\n{indent}{declaration}"),
        )],
        // `{ return ...` moves the first statement onto its own line
        BodyAnchor::Block {
            after_brace,
            indent,
            inline_first: Some(first),
        } => vec![TextEdit::replace(
            *after_brace..*first,
            format!("\n{indent}{declaration}\n{indent}"),
        )],
        BodyAnchor::Expr {
            span,
            outer_indent,
            inner_indent,
        } => vec![
            TextEdit::insert(
                span.start,
                format!("{{\n{inner_indent}{declaration}\n{inner_indent}return "),
            ),
            TextEdit::insert(span.end, format!(";\n{outer_indent}}}")),
        ],
    }
}

/// Imports go after the last import, else after the directive prologue,
/// else before the first statement.
fn import_edit(bindings: &ModuleBindings, imports: &[String]) -> TextEdit {
    let block = imports.join("\n");
    if let Some(end) = bindings.last_import_end.or(bindings.prologue_end) {
        return TextEdit::insert(end, format!("\n{block}"));
    }
    let start = bindings.first_item_start.unwrap_or(0);
    TextEdit::insert(start, format!("{block}\n"))
}
