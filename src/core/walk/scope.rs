//! Function scopes and module-level bindings relevant to declaration injection.

use std::ops::Range;

use swc_ecma_ast::{
    BlockStmt, Callee, Decl, Expr, ForHead, ImportSpecifier, Lit, MemberProp, Module, ModuleDecl,
    ModuleItem, ObjectPatProp, Param, Pat, PropName, Stmt, VarDecl, VarDeclOrExpr,
};

use crate::core::parsers::ParsedSource;

/// Indentation added per nesting level in generated code.
pub const INDENT_UNIT: &str = "  ";

/// Component functions are PascalCase; hooks are `use` + uppercase or bare `use`.
pub fn is_component_or_hook(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("use") {
        return rest.chars().next().is_none_or(|c| c.is_ascii_uppercase());
    }
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Where an accessor declaration goes inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyAnchor {
    /// Block body: insert right after the opening brace. `inline_first` is
    /// the start of a first statement sharing the brace line.
    Block {
        after_brace: usize,
        indent: String,
        inline_first: Option<usize>,
    },
    /// Expression body: wrap the expression into a block returning it.
    Expr {
        span: Range<usize>,
        outer_indent: String,
        inner_indent: String,
    },
}

/// An outermost component or hook function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInfo {
    pub name: String,
    pub anchor: BodyAnchor,
    /// The callee root is already a parameter or top-level body binding.
    pub declares_callee: bool,
}

impl ScopeInfo {
    pub fn for_block(
        source: &ParsedSource,
        name: &str,
        params: &[&Pat],
        body: &BlockStmt,
        callee_root: &str,
    ) -> Self {
        let brace = source.offset(body.span.lo);
        let index = source.line_index();
        let nested_indent = || format!("{}{INDENT_UNIT}", index.indentation(&source.code, brace));
        let (indent, inline_first) = match body.stmts.first() {
            Some(first) => {
                let start = source.offset(swc_common::Spanned::span(first).lo);
                let (first_line, _) = index.line_col(&source.code, start);
                let (brace_line, _) = index.line_col(&source.code, brace);
                if first_line > brace_line {
                    (index.indentation(&source.code, start).to_string(), None)
                } else {
                    (nested_indent(), Some(start))
                }
            }
            None => (nested_indent(), None),
        };

        let declares_callee = params.iter().any(|pat| pat_binds(pat, callee_root))
            || stmts_binding(&body.stmts, callee_root).is_some();

        Self {
            name: name.to_string(),
            anchor: BodyAnchor::Block {
                after_brace: brace + 1,
                indent,
                inline_first,
            },
            declares_callee,
        }
    }

    pub fn for_expr(
        source: &ParsedSource,
        name: &str,
        params: &[&Pat],
        span: Range<usize>,
        callee_root: &str,
    ) -> Self {
        let outer_indent = source
            .line_index()
            .indentation(&source.code, span.start)
            .to_string();
        let inner_indent = format!("{outer_indent}{INDENT_UNIT}");
        Self {
            name: name.to_string(),
            anchor: BodyAnchor::Expr {
                span,
                outer_indent,
                inner_indent,
            },
            declares_callee: params.iter().any(|pat| pat_binds(pat, callee_root)),
        }
    }
}

/// Module-level facts for the import injector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleBindings {
    /// Callee root is imported or declared at the top level.
    pub callee_root_bound: bool,
    /// What the top-level binding of the callee root refers to.
    pub callee_binding: Option<CalleeBinding>,
    /// Hook accessor is imported or declared at the top level.
    pub hook_bound: bool,
    /// End of the last import declaration.
    pub last_import_end: Option<usize>,
    /// End of the directive prologue (`'use client';`).
    pub prologue_end: Option<usize>,
    /// Start of the first module item.
    pub first_item_start: Option<usize>,
}

impl ModuleBindings {
    pub fn collect(source: &ParsedSource, callee_root: &str, hook_name: &str) -> Self {
        let module: &Module = &source.module;
        let mut bindings = ModuleBindings {
            first_item_start: module
                .body
                .first()
                .map(|item| source.offset(swc_common::Spanned::span(item).lo)),
            ..Default::default()
        };

        let mut in_prologue = true;
        for item in &module.body {
            if in_prologue {
                if let ModuleItem::Stmt(Stmt::Expr(expr_stmt)) = item
                    && matches!(&*expr_stmt.expr, Expr::Lit(Lit::Str(_)))
                {
                    bindings.prologue_end = Some(source.offset(expr_stmt.span.hi));
                    continue;
                }
                in_prologue = false;
            }

            if let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item {
                bindings.last_import_end = Some(source.offset(import.span.hi));
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(ns) => &ns.local,
                    };
                    if local.sym == callee_root {
                        bindings.bind_callee(CalleeBinding::Translation);
                    }
                    if local.sym == hook_name {
                        bindings.hook_bound = true;
                    }
                }
                continue;
            }

            let decl = match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => Some(decl),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => Some(&export.decl),
                _ => None,
            };
            if let Some(decl) = decl {
                if let Some(binding) = decl_binding(decl, callee_root) {
                    bindings.bind_callee(binding);
                }
                if decl_binds(decl, hook_name) {
                    bindings.hook_bound = true;
                }
            }
        }

        bindings
    }

    fn bind_callee(&mut self, binding: CalleeBinding) {
        self.callee_root_bound = true;
        if self.callee_binding != Some(CalleeBinding::Foreign) {
            self.callee_binding = Some(binding);
        }
    }
}

/// What a lexical binding of the callee root refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalleeBinding {
    /// An import, `const { t } = useTranslation()`, a `{ t }` prop or
    /// `const t = i18n.t`: calls through it still translate.
    Translation,
    /// Any other value (`(t) => ...`, `const t = Date.now()`): emitted calls
    /// would reach it instead of the translation function.
    Foreign,
}

pub fn param_pats(params: &[Param]) -> Vec<&Pat> {
    params.iter().map(|param| &param.pat).collect()
}

/// Binding of `name` among the parameters of a function.
pub fn params_binding(params: &[&Pat], name: &str) -> Option<CalleeBinding> {
    prefer_foreign(params.iter().map(|pat| pat_binding(pat, name)))
}

/// Binding of `name` declared directly in a statement list. Function
/// declarations and `var` are hoisted, so the whole list is considered.
pub fn stmts_binding(stmts: &[Stmt], name: &str) -> Option<CalleeBinding> {
    prefer_foreign(stmts.iter().map(|stmt| match stmt {
        Stmt::Decl(decl) => decl_binding(decl, name),
        _ => None,
    }))
}

/// Binding of `name` in the head of a `for`, `for-in` or `for-of` loop.
pub fn for_head_binding(head: &ForHead, name: &str) -> Option<CalleeBinding> {
    match head {
        ForHead::VarDecl(var) => var_binding(var, name),
        ForHead::Pat(_) | ForHead::UsingDecl(_) => None,
    }
}

pub fn for_init_binding(init: Option<&VarDeclOrExpr>, name: &str) -> Option<CalleeBinding> {
    match init {
        Some(VarDeclOrExpr::VarDecl(var)) => var_binding(var, name),
        _ => None,
    }
}

/// A foreign binding wins over a translation one in the same scope.
fn prefer_foreign(
    bindings: impl Iterator<Item = Option<CalleeBinding>>,
) -> Option<CalleeBinding> {
    bindings.flatten().max_by_key(|b| *b == CalleeBinding::Foreign)
}

fn decl_binds(decl: &Decl, name: &str) -> bool {
    decl_binding(decl, name).is_some()
}

fn decl_binding(decl: &Decl, name: &str) -> Option<CalleeBinding> {
    match decl {
        Decl::Var(var) => var_binding(var, name),
        Decl::Fn(f) if f.ident.sym == name => Some(CalleeBinding::Foreign),
        Decl::Class(c) if c.ident.sym == name => Some(CalleeBinding::Foreign),
        _ => None,
    }
}

fn var_binding(var: &VarDecl, name: &str) -> Option<CalleeBinding> {
    prefer_foreign(var.decls.iter().map(|decl| {
        let binding = pat_binding(&decl.name, name)?;
        let aliases_callee = decl
            .init
            .as_deref()
            .is_some_and(|init| aliases_callee(init, name));
        Some(if aliases_callee {
            CalleeBinding::Translation
        } else {
            binding
        })
    }))
}

/// `i18n.t`, `i18n.t.bind(i18n)` or `i18n.getFixedT(...)`.
fn aliases_callee(init: &Expr, name: &str) -> bool {
    match init {
        Expr::Member(member) => matches!(&member.prop, MemberProp::Ident(prop) if prop.sym == name),
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => match &**callee {
                Expr::Member(member) => match &member.prop {
                    MemberProp::Ident(prop) if prop.sym == "bind" => {
                        aliases_callee(&member.obj, name)
                    }
                    MemberProp::Ident(prop) => prop.sym == "getFixedT",
                    _ => false,
                },
                _ => false,
            },
            _ => false,
        },
        Expr::Paren(paren) => aliases_callee(&paren.expr, name),
        _ => false,
    }
}

/// Whether a binding pattern introduces `name`.
pub fn pat_binds(pat: &Pat, name: &str) -> bool {
    pat_binding(pat, name).is_some()
}

/// How a binding pattern introduces `name`, if it does. Destructuring a
/// property of that very name (`{ t }`, `{ t = fallback }`, `{ t: t }`) takes
/// the translation function from props or a hook; a bare identifier is a
/// different value.
pub fn pat_binding(pat: &Pat, name: &str) -> Option<CalleeBinding> {
    match pat {
        Pat::Ident(ident) if ident.id.sym == name => Some(CalleeBinding::Foreign),
        Pat::Array(array) => prefer_foreign(
            array
                .elems
                .iter()
                .flatten()
                .map(|p| pat_binding(p, name)),
        ),
        Pat::Rest(rest) => pat_binding(&rest.arg, name),
        Pat::Assign(assign) => pat_binding(&assign.left, name),
        Pat::Object(object) => prefer_foreign(object.props.iter().map(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => {
                let same_key = matches!(&kv.key, PropName::Ident(key) if key.sym == name);
                match pat_binding(&kv.value, name) {
                    Some(_) if same_key && kv.value.is_ident() => Some(CalleeBinding::Translation),
                    other => other,
                }
            }
            ObjectPatProp::Assign(assign) if assign.key.id.sym == name => {
                Some(CalleeBinding::Translation)
            }
            ObjectPatProp::Assign(_) => None,
            ObjectPatProp::Rest(rest) => pat_binding(&rest.arg, name),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::parse_source;

    #[test]
    fn test_is_component_or_hook() {
        assert!(is_component_or_hook("App"));
        assert!(is_component_or_hook("UserCard"));
        assert!(is_component_or_hook("useTitle"));
        assert!(is_component_or_hook("use"));
        assert!(!is_component_or_hook("user"));
        assert!(!is_component_or_hook("helper"));
        assert!(!is_component_or_hook("_App"));
    }

    #[test]
    fn test_module_bindings() {
        let code = "'use client';\nimport { t } from 'i18next';\nimport { useTranslation as useT } from 'react-i18next';\nconst a = 1;\n";
        let source = parse_source(code.to_string(), "a.ts").unwrap();
        let bindings = ModuleBindings::collect(&source, "t", "useTranslation");
        assert!(bindings.callee_root_bound);
        assert!(!bindings.hook_bound);
        assert_eq!(bindings.prologue_end, Some("'use client';".len()));
        let import_end = code.find("'react-i18next';").unwrap() + "'react-i18next';".len();
        assert_eq!(bindings.last_import_end, Some(import_end));
        assert_eq!(bindings.first_item_start, Some(0));
    }

    #[test]
    fn test_module_bindings_from_declarations() {
        let code = "export function useTranslation() {}\nconst { t } = useTranslation();\n";
        let source = parse_source(code.to_string(), "a.ts").unwrap();
        let bindings = ModuleBindings::collect(&source, "t", "useTranslation");
        assert!(bindings.callee_root_bound);
        assert!(bindings.hook_bound);
        assert_eq!(bindings.last_import_end, None);
        assert_eq!(bindings.prologue_end, None);
        assert_eq!(bindings.callee_binding, Some(CalleeBinding::Translation));
    }

    #[test]
    fn test_callee_bindings() {
        let cases = [
            ("import { t } from 'i18next';", Some(CalleeBinding::Translation)),
            ("const t = i18n.t;", Some(CalleeBinding::Translation)),
            ("const t = i18n.getFixedT('zh');", Some(CalleeBinding::Translation)),
            ("const { t, i18n } = useTranslation();", Some(CalleeBinding::Translation)),
            ("const t = Date.now();", Some(CalleeBinding::Foreign)),
            ("let [t] = pair;", Some(CalleeBinding::Foreign)),
            ("function t() {}", Some(CalleeBinding::Foreign)),
            ("class t {}", Some(CalleeBinding::Foreign)),
            ("const { t: translate } = useTranslation();", None),
            ("const tt = 1;", None),
        ];
        for (code, expected) in cases {
            let source = parse_source(code.to_string(), "a.ts").unwrap();
            let bindings = ModuleBindings::collect(&source, "t", "useTranslation");
            assert_eq!(bindings.callee_binding, expected, "{code}");
            assert_eq!(bindings.callee_root_bound, expected.is_some(), "{code}");
        }
    }
}
