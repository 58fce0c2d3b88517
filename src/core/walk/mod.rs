//! Tree walker: finds literal candidates and plans their rewrites.
//!
//! A single read-only `Visit` pass over the parsed module, in source order.
//! Nothing here touches the key registry; the resulting `FilePlan` lists
//! texts and spans, and keys are assigned later in a deterministic order.
//!
//! Context is tracked with two fields rather than parent links:
//! - `slot`: where the expression being visited sits, consumed by `visit_expr`
//! - `position_override`: structural position applied to every literal below
//!   (property keys, module specifiers, ignored callees, types...)

mod plan;
mod scope;

use std::collections::{HashMap, HashSet};
use std::mem;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    ArrayLit, ArrowExpr, AssignExpr, AssignPat, AssignPatProp, BlockStmt, BlockStmtOrExpr,
    CallExpr, Callee, CatchClause, ClassProp, CondExpr, ExportAll, Expr, ExprOrSpread, ExprStmt,
    FnDecl, FnExpr, ForInStmt, ForOfStmt, ForStmt, Function, ImportDecl, JSXAttr, JSXAttrName,
    JSXAttrValue, JSXElement, JSXElementChild, JSXElementName, JSXExpr, JSXText, KeyValueProp, Lit,
    MemberExpr, MemberProp, NamedExport, NewExpr, ParenExpr, Pat, PrivateProp, PropName,
    ReturnStmt, SeqExpr, Str, SwitchCase, TaggedTpl, ThrowStmt, Tpl, TsEnumMember, TsKeywordTypeKind,
    TsType, TsTypeAnn, TsUnionOrIntersectionType, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::debug;

pub use plan::{
    Candidate, CandidateKind, FilePlan, Join, Piece, Rewrite, SkipCounts, Slot, TemplateRewrite,
    UnsupportedLiteral, WrappedArg,
};
pub use scope::{
    BodyAnchor, CalleeBinding, INDENT_UNIT, ModuleBindings, ScopeInfo, is_component_or_hook,
};

use crate::config::Config;
use crate::core::classify::{Classification, ClassifyOptions, Position, classify};
use crate::core::keys::{decode_markup_entities, normalize_markup_text};
use crate::core::parsers::ParsedSource;
use crate::core::{RewriteError, SourceLocation};
use crate::utils::{contains_cjk, trimmed_range};

/// Split points inside a template quasi: ASCII sentence punctuation followed
/// by whitespace. The break goes after the whitespace.
static SEGMENT_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;:!?]\s+").unwrap());

/// Reason reported for literals where an emitted call would reach a local
/// binding of the callee instead of the translation function.
const SHADOWED_CALLEE: &str = "translation function shadowed";

/// Markup elements whose children are never text content.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Walker settings derived from the configuration.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Full callee path of the translation function (`t`, `i18n.t`).
    pub translation_call: String,
    /// First segment of `translation_call`, the identifier that must be bound.
    pub callee_root: String,
    pub hook_name: String,
    pub ignored_attributes: HashSet<String>,
    pub ignored_callees: Vec<String>,
    pub classify: ClassifyOptions,
}

impl WalkOptions {
    pub fn from_config(config: &Config) -> Self {
        let translation_call = config.translation_call_name.clone();
        let callee_root = translation_call
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            translation_call,
            callee_root,
            hook_name: config.hook_name.clone(),
            ignored_attributes: config.ignored_attributes.iter().cloned().collect(),
            ignored_callees: config.ignored_callees.clone(),
            classify: ClassifyOptions::new(&config.whitelist, &config.force_include),
        }
    }

    /// `console.log` matches itself; `console.*` matches any `console.` path.
    fn is_ignored_callee(&self, path: &str) -> bool {
        self.ignored_callees.iter().any(|pattern| {
            match pattern.strip_suffix(".*") {
                Some(prefix) => path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.')),
                None => pattern == path,
            }
        })
    }
}

/// Walk one parsed file and plan its rewrites.
pub fn plan_file(
    source: &ParsedSource,
    namespace: &str,
    options: &WalkOptions,
) -> Result<FilePlan, RewriteError> {
    let mut walker = Walker::new(source, namespace, options);
    source.module.visit_with(&mut walker);
    walker.finish()
}

struct Walker<'a> {
    source: &'a ParsedSource,
    options: &'a WalkOptions,
    plan: FilePlan,
    /// Slot of the next expression visited; reset by `visit_expr`.
    slot: Slot,
    position_override: Option<Position>,
    /// Rewrite frames. The bottom frame is the file; a frame is pushed for
    /// each interpolation of a decomposed template.
    frames: Vec<Vec<Rewrite>>,
    /// Index into `plan.scopes` of the outermost component or hook.
    current_scope: Option<usize>,
    /// Names given to function expressions by their declarator, by span start.
    fn_names: HashMap<BytePos, String>,
    /// Lexical bindings of the callee root, innermost last.
    callee_bindings: Vec<CalleeBinding>,
    error: Option<RewriteError>,
}

impl<'a> Walker<'a> {
    fn new(source: &'a ParsedSource, namespace: &str, options: &'a WalkOptions) -> Self {
        let mut plan = FilePlan {
            file_path: source.file_path.clone(),
            namespace: namespace.to_string(),
            bindings: ModuleBindings::collect(source, &options.callee_root, &options.hook_name),
            ..Default::default()
        };
        // Comments are never rewritten
        plan.skipped.non_translatable += source.cjk_comment_count;
        let callee_bindings = plan.bindings.callee_binding.into_iter().collect();

        Self {
            source,
            options,
            plan,
            slot: Slot::Expression,
            position_override: None,
            frames: vec![Vec::new()],
            current_scope: None,
            fn_names: HashMap::new(),
            callee_bindings,
            error: None,
        }
    }

    fn finish(mut self) -> Result<FilePlan, RewriteError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.plan.rewrites = self.frames.pop().unwrap_or_default();
        debug!(
            file = %self.plan.file_path,
            rewrites = self.plan.rewrites.len(),
            wrapped = self.plan.wrapped.len(),
            "planned file"
        );
        Ok(self.plan)
    }

    fn visit_in(&mut self, slot: Slot, expr: &Expr) {
        self.slot = slot;
        self.visit_expr(expr);
    }

    fn with_position<F>(&mut self, position: Position, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let prev = self.position_override.replace(position);
        f(self);
        self.position_override = prev;
    }

    /// Run `f` with `binding` as the innermost binding of the callee root.
    fn with_binding<F>(&mut self, binding: Option<CalleeBinding>, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let Some(binding) = binding else {
            return f(self);
        };
        self.callee_bindings.push(binding);
        f(self);
        self.callee_bindings.pop();
    }

    fn callee_shadowed(&self) -> bool {
        self.callee_bindings.last() == Some(&CalleeBinding::Foreign)
    }

    /// Literals under a shadowed callee cannot be wrapped.
    fn effective_slot(&self, slot: Slot) -> Slot {
        match slot {
            Slot::Unsupported(_) => slot,
            _ if self.callee_shadowed() => Slot::Unsupported(SHADOWED_CALLEE),
            _ => slot,
        }
    }

    /// Visit an initializer whose target is annotated with a literal type.
    fn visit_constrained(&mut self, annotation: Option<&TsTypeAnn>, slot: Slot, expr: &Expr) {
        if annotation.is_some_and(|ann| is_literal_type(&ann.type_ann)) {
            self.with_position(Position::TypeOnly, |this| this.visit_in(slot, expr));
        } else {
            self.visit_in(slot, expr);
        }
    }

    fn position(&self) -> Position {
        self.position_override.unwrap_or(Position::Value)
    }

    fn classify(&self, text: &str) -> Classification {
        classify(text, self.position(), &self.options.classify)
    }

    fn push_rewrite(&mut self, rewrite: Rewrite) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(rewrite);
        }
    }

    fn candidate(
        &self,
        text: String,
        kind: CandidateKind,
        slot: Slot,
        span: Range<usize>,
    ) -> Candidate {
        Candidate {
            text,
            kind,
            slot,
            context: self.source.context(span.start),
            span,
            scope: self.current_scope,
        }
    }

    fn unsupported(&mut self, offset: usize, text: &str, reason: &'static str) {
        debug!(file = %self.plan.file_path, offset, reason, "unsupported literal position");
        self.plan.unsupported.push(UnsupportedLiteral {
            context: self.source.context(offset),
            text: text.to_string(),
            reason,
        });
        self.plan.skipped.unsupported += 1;
    }

    fn fail(&mut self, offset: usize, message: &str) {
        if self.error.is_none() {
            self.error = Some(RewriteError::ParseFailure {
                location: self.location(offset),
                message: message.to_string(),
            });
        }
    }

    fn location(&self, offset: usize) -> SourceLocation {
        self.source.location(offset)
    }

    /// Count a literal that is never rewritten.
    fn record_skip(&mut self, text: &str, position: Position) {
        let classification = classify(text, position, &self.options.classify);
        self.plan.skipped.record(match classification {
            Classification::Translate => Classification::SkipNonTranslatable,
            other => other,
        });
    }

    // ---- literals ----

    fn on_str(&mut self, node: &Str, slot: Slot) {
        let Some(text) = node.value.as_str() else {
            return;
        };
        let classification = self.classify(text);
        if !classification.is_translate() {
            self.plan.skipped.record(classification);
            return;
        }

        let span = self.source.range(node.span);
        if let Slot::Unsupported(reason) = slot {
            self.unsupported(span.start, text, reason);
            return;
        }
        let candidate = self.candidate(text.to_string(), CandidateKind::Literal, slot, span);
        self.push_rewrite(Rewrite::Literal(candidate));
    }

    /// Cooked text of every quasi, or `None` after recording a failure.
    fn cooked_quasis(&mut self, tpl: &Tpl) -> Option<Vec<String>> {
        let mut texts = Vec::with_capacity(tpl.quasis.len());
        for quasi in &tpl.quasis {
            match quasi.cooked.as_ref().and_then(|cooked| cooked.as_str()) {
                Some(text) => texts.push(text.to_string()),
                None if contains_cjk(&quasi.raw) => {
                    let offset = self.source.offset(quasi.span.lo);
                    self.fail(offset, "invalid escape sequence in template text");
                    return None;
                }
                None => texts.push(String::new()),
            }
        }
        Some(texts)
    }

    fn on_tpl(&mut self, tpl: &Tpl, slot: Slot, markup_container: Option<Range<usize>>) {
        let Some(quasis) = self.cooked_quasis(tpl) else {
            return;
        };
        let span = self.source.range(tpl.span);

        if tpl.exprs.is_empty() {
            let text = quasis.concat();
            let classification = self.classify(&text);
            if !classification.is_translate() {
                self.plan.skipped.record(classification);
            } else if let Slot::Unsupported(reason) = slot {
                self.unsupported(span.start, &text, reason);
            } else {
                let candidate = self.candidate(text, CandidateKind::TemplateSegment, slot, span);
                self.push_rewrite(Rewrite::Literal(candidate));
            }
            return;
        }

        let segments: Vec<Vec<(String, Classification)>> = quasis
            .iter()
            .map(|quasi| {
                split_segments(quasi)
                    .into_iter()
                    .map(|segment| {
                        let classification = self.classify(segment);
                        (segment.to_string(), classification)
                    })
                    .collect()
            })
            .collect();
        let translates = segments.iter().flatten().any(|(_, c)| c.is_translate());

        if !translates || matches!(slot, Slot::Unsupported(_)) {
            if let Slot::Unsupported(reason) = slot
                && translates
            {
                self.unsupported(span.start, &quasis.concat(), reason);
            } else {
                for (_, classification) in segments.iter().flatten() {
                    self.plan.skipped.record(*classification);
                }
            }
            for expr in &tpl.exprs {
                self.visit_in(Slot::Standalone, expr);
            }
            return;
        }

        let (span, join) = match markup_container {
            Some(container) => (container, Join::MarkupChildren),
            None => (span, Join::Concat),
        };

        let mut pieces = Vec::new();
        let mut exprs = tpl.exprs.iter();
        for quasi_segments in segments {
            for (text, classification) in quasi_segments {
                if !classification.is_translate() {
                    self.plan.skipped.record(classification);
                }
                pieces.push(Piece::Text {
                    text,
                    translate: classification.is_translate(),
                });
            }
            if let Some(expr) = exprs.next() {
                self.frames.push(Vec::new());
                self.visit_in(Slot::Standalone, expr);
                let nested = self.frames.pop().unwrap_or_default();
                pieces.push(Piece::Interpolation {
                    span: self.source.range(expr.span()),
                    parenthesize: !is_concat_operand(expr),
                    nested,
                });
            }
        }

        let context = self.source.context(span.start);
        self.push_rewrite(Rewrite::Template(TemplateRewrite {
            span,
            context,
            pieces,
            join,
            slot,
            scope: self.current_scope,
        }));
    }

    // ---- calls ----

    /// The first argument is a key or source text; later arguments (options,
    /// `defaultValue`) are already under translation too.
    fn on_translation_call(&mut self, node: &CallExpr) {
        let Some((first, rest)) = node.args.split_first() else {
            return;
        };
        let text = match &*first.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
                .quasis
                .first()
                .and_then(|q| q.cooked.as_ref())
                .and_then(|cooked| cooked.as_str())
                .map(str::to_string),
            _ => None,
        };
        match text {
            Some(text) => {
                self.plan.skipped.record(classify(
                    &text,
                    Position::TranslationArgument,
                    &self.options.classify,
                ));
                self.plan.wrapped.push(WrappedArg {
                    is_text: contains_cjk(&text),
                    text,
                });
            }
            None => self.visit_args_with(
                Some(Position::TranslationOptions),
                std::slice::from_ref(first),
            ),
        }
        self.visit_args_with(Some(Position::TranslationOptions), rest);
    }

    fn visit_args_with(&mut self, position: Option<Position>, args: &[ExprOrSpread]) {
        let visit = |this: &mut Self| {
            for arg in args {
                this.visit_in(Slot::Standalone, &arg.expr);
            }
        };
        match position {
            Some(position) => self.with_position(position, visit),
            None => visit(self),
        }
    }

    // ---- functions ----

    fn enter_function(&mut self, name: Option<String>, function: &Function) {
        let outer = self.current_scope;
        if outer.is_none()
            && let Some(name) = name.filter(|n| is_component_or_hook(n))
            && let Some(body) = &function.body
        {
            let params = scope::param_pats(&function.params);
            let info = ScopeInfo::for_block(
                self.source,
                &name,
                &params,
                body,
                &self.options.callee_root,
            );
            self.current_scope = Some(self.plan.scopes.len());
            self.plan.scopes.push(info);
        }
        function.visit_with(self);
        self.current_scope = outer;
    }

    fn record_fn_name(&mut self, name: &str, init: &Expr) {
        match init {
            Expr::Arrow(arrow) => {
                self.fn_names.insert(arrow.span.lo, name.to_string());
            }
            Expr::Fn(fn_expr) if fn_expr.ident.is_none() => {
                self.fn_names
                    .insert(fn_expr.function.span.lo, name.to_string());
            }
            Expr::Paren(paren) => self.record_fn_name(name, &paren.expr),
            // memo(() => ...), forwardRef(function (props, ref) {...})
            Expr::Call(call) => {
                if let Some(first) = call.args.first() {
                    self.record_fn_name(name, &first.expr);
                }
            }
            _ => {}
        }
    }
}

impl Visit for Walker<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        let taken = mem::replace(&mut self.slot, Slot::Expression);
        let slot = self.effective_slot(taken);
        match node {
            Expr::Lit(Lit::Str(s)) => self.on_str(s, slot),
            Expr::Lit(Lit::Regex(regex)) => {
                let position = self.position_override.unwrap_or(Position::RegexBody);
                self.record_skip(&regex.exp, position);
            }
            Expr::Tpl(tpl) => self.on_tpl(tpl, slot, None),
            // `'是' as const`, `x as '是' | '否'`: the value is its own type
            Expr::TsConstAssertion(assertion) => {
                self.with_position(Position::TypeOnly, |this| {
                    this.visit_in(slot, &assertion.expr)
                });
            }
            Expr::TsAs(cast) if is_literal_type(&cast.type_ann) => {
                self.with_position(Position::TypeOnly, |this| this.visit_in(slot, &cast.expr));
            }
            Expr::TsSatisfies(check) if is_literal_type(&check.type_ann) => {
                self.with_position(Position::TypeOnly, |this| this.visit_in(slot, &check.expr));
            }
            _ => node.visit_children_with(self),
        }
    }

    /// Strings reached outside `visit_expr`: module names, type literals,
    /// string property keys and the like. Never rewritten.
    fn visit_str(&mut self, node: &Str) {
        if let Some(text) = node.value.as_str() {
            let position = self.position_override.unwrap_or(Position::TypeOnly);
            self.record_skip(text, position);
        }
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        node.tag.visit_with(self);
        let Some(quasis) = self.cooked_quasis(&node.tpl) else {
            return;
        };
        for (quasi, text) in node.tpl.quasis.iter().zip(&quasis) {
            if self.classify(text).is_translate() {
                let offset = self.source.offset(quasi.span.lo);
                self.unsupported(offset, text, "tagged template");
            } else {
                self.record_skip(text, self.position());
            }
        }
        for expr in &node.tpl.exprs {
            self.visit_in(Slot::Standalone, expr);
        }
    }

    fn visit_expr_stmt(&mut self, node: &ExprStmt) {
        self.visit_in(Slot::Unsupported("expression statement"), &node.expr);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        match &node.callee {
            Callee::Expr(callee) => {
                let path = callee_path(callee);
                let position = match path.as_deref() {
                    Some(path) if path == self.options.translation_call => {
                        self.on_translation_call(node);
                        return;
                    }
                    Some(path) if self.options.is_ignored_callee(path) => {
                        Some(Position::IgnoredCallArgument)
                    }
                    Some("require") => Some(Position::ModuleSpecifier),
                    Some("RegExp") => Some(Position::RegexBody),
                    _ => None,
                };
                callee.visit_with(self);
                self.visit_args_with(position, &node.args);
            }
            Callee::Import(_) => self.visit_args_with(Some(Position::ModuleSpecifier), &node.args),
            Callee::Super(_) => self.visit_args_with(None, &node.args),
        }
    }

    fn visit_new_expr(&mut self, node: &NewExpr) {
        node.callee.visit_with(self);
        let position = match callee_path(&node.callee).as_deref() {
            Some("RegExp") => Some(Position::RegexBody),
            _ => None,
        };
        if let Some(args) = &node.args {
            self.visit_args_with(position, args);
        }
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        node.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &node.prop {
            self.with_position(Position::PropertyKey, |this| {
                computed.expr.visit_with(this);
            });
        }
    }

    fn visit_prop_name(&mut self, node: &PropName) {
        self.with_position(Position::PropertyKey, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        node.key.visit_with(self);
        self.visit_in(Slot::ObjectValue, &node.value);
    }

    fn visit_class_prop(&mut self, node: &ClassProp) {
        for decorator in &node.decorators {
            decorator.visit_with(self);
        }
        node.key.visit_with(self);
        if let Some(type_ann) = &node.type_ann {
            type_ann.visit_with(self);
        }
        if let Some(value) = &node.value {
            self.visit_constrained(node.type_ann.as_deref(), Slot::FieldInitializer, value);
        }
    }

    fn visit_private_prop(&mut self, node: &PrivateProp) {
        for decorator in &node.decorators {
            decorator.visit_with(self);
        }
        if let Some(value) = &node.value {
            self.visit_in(Slot::FieldInitializer, value);
        }
    }

    fn visit_assign_pat(&mut self, node: &AssignPat) {
        node.left.visit_with(self);
        let annotation = match &*node.left {
            Pat::Ident(ident) => ident.type_ann.as_deref(),
            _ => None,
        };
        self.visit_constrained(annotation, Slot::DefaultParam, &node.right);
    }

    fn visit_assign_pat_prop(&mut self, node: &AssignPatProp) {
        if let Some(value) = &node.value {
            self.visit_in(Slot::DefaultParam, value);
        }
    }

    fn visit_array_lit(&mut self, node: &ArrayLit) {
        for elem in node.elems.iter().flatten() {
            self.visit_in(Slot::ArrayElement, &elem.expr);
        }
    }

    fn visit_switch_case(&mut self, node: &SwitchCase) {
        if let Some(test) = &node.test {
            self.visit_in(Slot::CaseTest, test);
        }
        node.cons.visit_with(self);
    }

    fn visit_throw_stmt(&mut self, node: &ThrowStmt) {
        self.visit_in(Slot::ThrowArgument, &node.arg);
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) {
        if let Some(arg) = &node.arg {
            self.visit_in(Slot::Standalone, arg);
        }
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        node.name.visit_with(self);
        if let Some(init) = &node.init {
            let ident = node.name.as_ident();
            if let Some(ident) = ident {
                self.record_fn_name(ident.id.sym.as_str(), init);
            }
            let annotation = ident.and_then(|ident| ident.type_ann.as_deref());
            self.visit_constrained(annotation, Slot::Standalone, init);
        }
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        node.left.visit_with(self);
        self.visit_in(Slot::Standalone, &node.right);
    }

    fn visit_cond_expr(&mut self, node: &CondExpr) {
        node.test.visit_with(self);
        self.visit_in(Slot::Standalone, &node.cons);
        self.visit_in(Slot::Standalone, &node.alt);
    }

    fn visit_seq_expr(&mut self, node: &SeqExpr) {
        for expr in &node.exprs {
            self.visit_in(Slot::Standalone, expr);
        }
    }

    fn visit_paren_expr(&mut self, node: &ParenExpr) {
        self.visit_in(Slot::Standalone, &node.expr);
    }

    // ---- bindings of the callee root ----

    fn visit_function(&mut self, node: &Function) {
        let params = scope::param_pats(&node.params);
        let binding = scope::params_binding(&params, &self.options.callee_root);
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        let binding = scope::stmts_binding(&node.stmts, &self.options.callee_root);
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let binding = node
            .param
            .as_ref()
            .and_then(|param| scope::pat_binding(param, &self.options.callee_root));
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        let binding = scope::for_init_binding(node.init.as_ref(), &self.options.callee_root);
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        let binding = scope::for_head_binding(&node.left, &self.options.callee_root);
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        let binding = scope::for_head_binding(&node.left, &self.options.callee_root);
        self.with_binding(binding, |this| node.visit_children_with(this));
    }

    // ---- functions ----

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.enter_function(Some(node.ident.sym.to_string()), &node.function);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        let name = node
            .ident
            .as_ref()
            .map(|ident| ident.sym.to_string())
            .or_else(|| self.fn_names.get(&node.function.span.lo).cloned());
        self.enter_function(name, &node.function);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let outer = self.current_scope;
        if outer.is_none()
            && let Some(name) = self.fn_names.get(&node.span.lo).cloned()
            && is_component_or_hook(&name)
        {
            let params: Vec<_> = node.params.iter().collect();
            let info = match &*node.body {
                BlockStmtOrExpr::BlockStmt(block) => ScopeInfo::for_block(
                    self.source,
                    &name,
                    &params,
                    block,
                    &self.options.callee_root,
                ),
                BlockStmtOrExpr::Expr(expr) => ScopeInfo::for_expr(
                    self.source,
                    &name,
                    &params,
                    self.source.range(expr.span()),
                    &self.options.callee_root,
                ),
            };
            self.current_scope = Some(self.plan.scopes.len());
            self.plan.scopes.push(info);
        }

        let params: Vec<_> = node.params.iter().collect();
        let binding = scope::params_binding(&params, &self.options.callee_root);
        self.with_binding(binding, |this| {
            for param in &node.params {
                param.visit_with(this);
            }
            match &*node.body {
                BlockStmtOrExpr::BlockStmt(block) => block.visit_with(this),
                BlockStmtOrExpr::Expr(expr) => this.visit_in(Slot::Standalone, expr),
            }
        });
        self.current_scope = outer;
    }

    // ---- markup ----

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        node.opening.visit_with(self);

        let raw_text = matches!(
            &node.opening.name,
            JSXElementName::Ident(ident) if RAW_TEXT_ELEMENTS.contains(&ident.sym.as_str())
        );
        if raw_text {
            return;
        }

        for child in &node.children {
            child.visit_with(self);
        }
    }

    fn visit_jsx_element_child(&mut self, node: &JSXElementChild) {
        let JSXElementChild::JSXExprContainer(container) = node else {
            node.visit_children_with(self);
            return;
        };
        let JSXExpr::Expr(expr) = &container.expr else {
            return;
        };
        match &**expr {
            Expr::Tpl(tpl) if !tpl.exprs.is_empty() => {
                let span = self.source.range(container.span);
                self.on_tpl(tpl, self.effective_slot(Slot::MarkupChild), Some(span));
            }
            _ => self.visit_in(Slot::MarkupChild, expr),
        }
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        let span = self.source.range(node.span);
        let raw = self.source.code.get(span.clone()).unwrap_or("");
        let Some((start, end)) = trimmed_range(raw) else {
            return;
        };

        let text = decode_markup_entities(&normalize_markup_text(&raw[start..end])).into_owned();
        let classification = self.classify(&text);
        if !classification.is_translate() {
            self.plan.skipped.record(classification);
            return;
        }
        let span = span.start + start..span.start + end;
        if self.callee_shadowed() {
            self.unsupported(span.start, &text, SHADOWED_CALLEE);
            return;
        }
        let candidate = self.candidate(text, CandidateKind::MarkupText, Slot::MarkupChild, span);
        self.push_rewrite(Rewrite::MarkupText(candidate));
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        let name = match &node.name {
            JSXAttrName::Ident(ident) => ident.sym.to_string(),
            JSXAttrName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
        };
        let Some(value) = &node.value else {
            return;
        };

        if self.options.ignored_attributes.contains(&name) {
            self.with_position(Position::IgnoredAttribute, |this| {
                value.visit_children_with(this);
            });
            return;
        }

        match value {
            JSXAttrValue::Str(s) => {
                // Attribute strings take no escapes, only entities
                let span = self.source.range(s.span);
                let Some(raw) = self.source.code.get(span.start + 1..span.end - 1) else {
                    return;
                };
                let text = decode_markup_entities(raw).into_owned();
                let classification = self.classify(&text);
                if !classification.is_translate() {
                    self.plan.skipped.record(classification);
                    return;
                }
                if self.callee_shadowed() {
                    self.unsupported(span.start, &text, SHADOWED_CALLEE);
                    return;
                }
                let candidate = self.candidate(
                    text,
                    CandidateKind::MarkupAttribute,
                    Slot::MarkupAttribute,
                    span,
                );
                self.push_rewrite(Rewrite::MarkupAttribute(candidate));
            }
            JSXAttrValue::JSXExprContainer(container) => {
                if let JSXExpr::Expr(expr) = &container.expr {
                    self.visit_in(Slot::MarkupAttribute, expr);
                }
            }
            _ => value.visit_children_with(self),
        }
    }

    // ---- structural positions ----

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        self.with_position(Position::ModuleSpecifier, |this| node.src.visit_with(this));
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        self.with_position(Position::ModuleSpecifier, |this| node.src.visit_with(this));
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        if let Some(src) = &node.src {
            self.with_position(Position::ModuleSpecifier, |this| src.visit_with(this));
        }
    }

    fn visit_ts_type(&mut self, node: &TsType) {
        self.with_position(Position::TypeOnly, |this| node.visit_children_with(this));
    }

    fn visit_ts_type_ann(&mut self, node: &TsTypeAnn) {
        self.with_position(Position::TypeOnly, |this| node.visit_children_with(this));
    }

    fn visit_ts_enum_member(&mut self, node: &TsEnumMember) {
        self.with_position(Position::TypeOnly, |this| node.visit_children_with(this));
    }
}

/// Dotted path of a callee made of identifiers: `t`, `i18n.t`, `this.props.t`.
fn callee_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            Some(format!("{}.{}", callee_path(&member.obj)?, prop.sym))
        }
        _ => None,
    }
}

/// A type admitting only literal values: `'是'`, `'是' | '否'`, `('是')`.
/// `null` and `undefined` may join a union.
fn is_literal_type(ty: &TsType) -> bool {
    match ty {
        TsType::TsLitType(_) => true,
        TsType::TsParenthesizedType(paren) => is_literal_type(&paren.type_ann),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            let mut has_literal = false;
            for member in &union.types {
                match &**member {
                    TsType::TsKeywordType(keyword)
                        if matches!(
                            keyword.kind,
                            TsKeywordTypeKind::TsNullKeyword
                                | TsKeywordTypeKind::TsUndefinedKeyword
                        ) => {}
                    member if is_literal_type(member) => has_literal = true,
                    _ => return false,
                }
            }
            has_literal
        }
        _ => false,
    }
}

/// Expressions that bind at least as tightly as `+` and can be concatenated
/// without parentheses.
fn is_concat_operand(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ident(_)
            | Expr::Lit(_)
            | Expr::Member(_)
            | Expr::SuperProp(_)
            | Expr::Call(_)
            | Expr::OptChain(_)
            | Expr::Paren(_)
            | Expr::Tpl(_)
            | Expr::TaggedTpl(_)
            | Expr::This(_)
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::New(_)
            | Expr::Unary(_)
            | Expr::Update(_)
            | Expr::Await(_)
    )
}

/// Split quasi text after ASCII sentence punctuation followed by whitespace.
///
/// `"欢迎, 用户"` becomes `["欢迎, ", "用户"]`. Empty text yields no segment.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for m in SEGMENT_BREAK.find_iter(text) {
        segments.push(&text[start..m.end()]);
        start = m.end();
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

#[cfg(test)]
mod tests;
