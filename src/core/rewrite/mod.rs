//! Rewrite strategies: turn a planned rewrite into replacement text.
//!
//! One strategy per `Rewrite` variant, chosen by an exhaustive match. Keys
//! come from the registry, which already holds every text of the plan by the
//! time a file is rendered, so rendering never allocates new keys in
//! practice and files can be rendered in any order.

pub mod edit;

use std::collections::BTreeSet;

use tracing::debug;

pub use edit::{TextEdit, apply_edits, apply_edits_in, quote_js};

use crate::core::keys::KeyRegistry;
use crate::core::walk::{Candidate, FilePlan, Join, Piece, Rewrite, TemplateRewrite};
use crate::core::{RewriteError, SourceContext};

/// A rewrite as shown to the user before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePreview {
    pub context: SourceContext,
    pub original: String,
    pub replacement: String,
}

/// A literal left untouched because no key could be assigned.
#[derive(Debug)]
pub struct KeyFailure {
    pub context: SourceContext,
    pub error: RewriteError,
}

/// Rendered rewrites for one file, before declaration injection.
#[derive(Debug, Default)]
pub struct RenderedFile {
    pub edits: Vec<TextEdit>,
    /// (key, text) for every call emitted, first occurrence order.
    pub entries: Vec<(String, String)>,
    /// Number of translation calls emitted.
    pub translated: usize,
    pub previews: Vec<RewritePreview>,
    pub failures: Vec<KeyFailure>,
    /// Scopes (indexes into `FilePlan::scopes`) that received a call.
    pub used_scopes: BTreeSet<usize>,
    /// A call was emitted outside every component or hook.
    pub needs_module_access: bool,
}

impl RenderedFile {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Render every rewrite of a plan into text edits over `code`.
pub fn render_plan(
    plan: &FilePlan,
    code: &str,
    registry: &KeyRegistry,
    call_name: &str,
) -> RenderedFile {
    let mut renderer = Renderer {
        code,
        registry,
        namespace: &plan.namespace,
        call_name,
        out: RenderedFile::default(),
    };
    for rewrite in &plan.rewrites {
        renderer.render_top_level(rewrite);
    }
    debug!(
        file = %plan.file_path,
        edits = renderer.out.edits.len(),
        translated = renderer.out.translated,
        "rendered file"
    );
    renderer.out
}

struct Renderer<'a> {
    code: &'a str,
    registry: &'a KeyRegistry,
    namespace: &'a str,
    call_name: &'a str,
    out: RenderedFile,
}

/// Kind of a rendered template piece, for joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    Call,
    Text,
    Interpolation,
}

impl Renderer<'_> {
    fn render_top_level(&mut self, rewrite: &Rewrite) {
        let edits = self.render(rewrite);
        for edit in &edits {
            self.out.previews.push(RewritePreview {
                context: self.preview_context(rewrite, edit),
                original: self.code.get(edit.start..edit.end).unwrap_or("").to_string(),
                replacement: edit.text.clone(),
            });
        }
        self.out.edits.extend(edits);
    }

    fn preview_context(&self, rewrite: &Rewrite, edit: &TextEdit) -> SourceContext {
        // Failed templates emit their nested rewrites individually
        match rewrite {
            Rewrite::Template(template) if edit.start != template.span.start => {
                find_context(rewrite, edit.start).unwrap_or_else(|| template.context.clone())
            }
            _ => rewrite.context().clone(),
        }
    }

    /// Edits for one rewrite. Empty when its key could not be assigned.
    fn render(&mut self, rewrite: &Rewrite) -> Vec<TextEdit> {
        match rewrite {
            Rewrite::Literal(candidate) => self
                .call_for(candidate)
                .map(|call| vec![TextEdit::replace(candidate.span.clone(), call)])
                .unwrap_or_default(),
            Rewrite::MarkupText(candidate) | Rewrite::MarkupAttribute(candidate) => self
                .call_for(candidate)
                .map(|call| {
                    let container = format!("{{{call}}}");
                    vec![TextEdit::replace(candidate.span.clone(), container)]
                })
                .unwrap_or_default(),
            Rewrite::Template(template) => self.render_template(template),
        }
    }

    fn call_for(&mut self, candidate: &Candidate) -> Option<String> {
        let call = self.keyed_call(&candidate.text, &candidate.context)?;
        self.mark_scope(candidate.scope);
        Some(call)
    }

    fn keyed_call(&mut self, text: &str, context: &SourceContext) -> Option<String> {
        match self.registry.resolve(self.namespace, text) {
            Ok(key) => Some(self.emit_call(key, text)),
            Err(error) => {
                debug!(%error, "key assignment failed");
                self.out.failures.push(KeyFailure {
                    context: context.clone(),
                    error,
                });
                None
            }
        }
    }

    /// `t('key')`, recording the manifest entry.
    fn emit_call(&mut self, key: String, text: &str) -> String {
        self.out.translated += 1;
        let call = format!("{}({})", self.call_name, quote_js(&key));
        if !self.out.entries.iter().any(|(k, _)| *k == key) {
            self.out.entries.push((key, text.to_string()));
        }
        call
    }

    fn mark_scope(&mut self, scope: Option<usize>) {
        match scope {
            Some(index) => {
                self.out.used_scopes.insert(index);
            }
            None => self.out.needs_module_access = true,
        }
    }

    fn render_template(&mut self, template: &TemplateRewrite) -> Vec<TextEdit> {
        // All keys first: a template is either fully decomposed or untouched.
        let mut keys = Vec::new();
        for text in template.pieces.iter().filter_map(translated_text) {
            match self.registry.resolve(self.namespace, text) {
                Ok(key) => keys.push(key),
                Err(error) => {
                    self.out.failures.push(KeyFailure {
                        context: template.context.clone(),
                        error,
                    });
                }
            }
        }
        if keys.len() != template.pieces.iter().filter_map(translated_text).count() {
            // Leave the template as written but still rewrite inside it
            let mut edits = Vec::new();
            for piece in &template.pieces {
                if let Piece::Interpolation { nested, .. } = piece {
                    for rewrite in nested {
                        edits.extend(self.render(rewrite));
                    }
                }
            }
            return edits;
        }

        let mut parts: Vec<(PartKind, String)> = Vec::new();
        let mut keys = keys.into_iter();
        for piece in &template.pieces {
            match piece {
                Piece::Text {
                    text,
                    translate: true,
                } => {
                    let Some(key) = keys.next() else {
                        continue;
                    };
                    let call = self.emit_call(key, text);
                    parts.push((PartKind::Call, call));
                }
                Piece::Text { text, .. } => {
                    if !text.is_empty() {
                        parts.push((PartKind::Text, quote_js(text)));
                    }
                }
                Piece::Interpolation {
                    span,
                    parenthesize,
                    nested,
                } => {
                    let nested_edits: Vec<TextEdit> =
                        nested.iter().flat_map(|r| self.render(r)).collect();
                    let expr = match apply_edits_in(self.code, span.clone(), &nested_edits) {
                        Ok(expr) => expr,
                        Err(_) => self.code.get(span.clone()).unwrap_or("").to_string(),
                    };
                    let expr = if *parenthesize && template.join == Join::Concat {
                        format!("({expr})")
                    } else {
                        expr
                    };
                    parts.push((PartKind::Interpolation, expr));
                }
            }
        }
        self.mark_scope(template.scope);

        let replacement = match template.join {
            Join::Concat => join_concat(parts, template.slot.needs_parens()),
            Join::MarkupChildren => parts
                .into_iter()
                .map(|(_, part)| format!("{{{part}}}"))
                .collect(),
        };
        vec![TextEdit::replace(template.span.clone(), replacement)]
    }
}

fn translated_text(piece: &Piece) -> Option<&str> {
    match piece {
        Piece::Text {
            text,
            translate: true,
        } => Some(text),
        _ => None,
    }
}

/// `a + b + c`, keeping string semantics when the chain starts with two
/// interpolations.
fn join_concat(parts: Vec<(PartKind, String)>, parenthesize: bool) -> String {
    let leading_interpolations = parts
        .iter()
        .take(2)
        .filter(|(kind, _)| *kind == PartKind::Interpolation)
        .count();

    let mut texts: Vec<String> = Vec::with_capacity(parts.len() + 1);
    if leading_interpolations == 2 {
        texts.push("''".to_string());
    }
    texts.extend(parts.into_iter().map(|(_, part)| part));

    let joined = texts.join(" + ");
    if parenthesize && texts.len() > 1 {
        format!("({joined})")
    } else {
        joined
    }
}

/// Context of the nested rewrite starting at `offset`.
fn find_context(rewrite: &Rewrite, offset: usize) -> Option<SourceContext> {
    if rewrite.span().start == offset {
        return Some(rewrite.context().clone());
    }
    let Rewrite::Template(template) = rewrite else {
        return None;
    };
    template.pieces.iter().find_map(|piece| match piece {
        Piece::Interpolation { nested, .. } => {
            nested.iter().find_map(|inner| find_context(inner, offset))
        }
        Piece::Text { .. } => None,
    })
}
