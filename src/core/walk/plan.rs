//! Rewrite plan produced by the walker.
//!
//! A plan is a flat, source-ordered list of `Rewrite` entries. Templates
//! decomposed around interpolations own the rewrites found inside those
//! interpolations, so the outer fragment is rendered from already rewritten
//! inner fragments.

use std::ops::Range;

use super::scope::{ModuleBindings, ScopeInfo};
use crate::core::{RewriteError, SourceContext, classify::Classification};

/// Syntactic kind of a literal candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Literal,
    TemplateSegment,
    MarkupText,
    MarkupAttribute,
}

/// Enclosing context of a literal, deciding how its replacement is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Operand of a larger expression; a `+` chain must be parenthesized.
    Expression,
    /// Complete expression on its own: initializer, argument, return value...
    Standalone,
    DefaultParam,
    CaseTest,
    ThrowArgument,
    ArrayElement,
    ObjectValue,
    FieldInitializer,
    /// Sole expression of a markup child container.
    MarkupChild,
    /// Expression container of a markup attribute.
    MarkupAttribute,
    /// No rewrite strategy exists here.
    Unsupported(&'static str),
}

impl Slot {
    /// Whether a concatenation replacing the literal needs parentheses.
    pub fn needs_parens(self) -> bool {
        matches!(self, Slot::Expression)
    }
}

/// One literal (or literal segment) to be replaced by a translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Runtime text, normalized for markup.
    pub text: String,
    pub kind: CandidateKind,
    pub slot: Slot,
    /// Byte range replaced in the original file.
    pub span: Range<usize>,
    pub context: SourceContext,
    /// Index into `FilePlan::scopes` of the enclosing component or hook.
    pub scope: Option<usize>,
}

/// Ordered piece of a decomposed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Literal text. `translate` is false for segments left as plain strings.
    Text { text: String, translate: bool },
    Interpolation {
        span: Range<usize>,
        /// Below `+` in precedence; must be wrapped when concatenated.
        parenthesize: bool,
        /// Rewrites inside the interpolation expression.
        nested: Vec<Rewrite>,
    },
}

/// How decomposed template pieces are put back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// `t('a') + name + t('b')`
    Concat,
    /// `{t('a')}{name}{t('b')}` replacing a markup child container.
    MarkupChildren,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRewrite {
    /// Template span, or the enclosing container span for markup children.
    pub span: Range<usize>,
    pub context: SourceContext,
    pub pieces: Vec<Piece>,
    pub join: Join,
    pub slot: Slot,
    pub scope: Option<usize>,
}

/// A planned rewrite. Each variant is rendered by exactly one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// String literal, or template without interpolation: `t('key')`.
    Literal(Candidate),
    /// Template with interpolations, decomposed.
    Template(TemplateRewrite),
    /// Markup text child: `{t('key')}`.
    MarkupText(Candidate),
    /// Quoted markup attribute value: `{t('key')}`.
    MarkupAttribute(Candidate),
}

impl Rewrite {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Rewrite::Literal(c) | Rewrite::MarkupText(c) | Rewrite::MarkupAttribute(c) => &c.span,
            Rewrite::Template(template) => &template.span,
        }
    }

    pub fn context(&self) -> &SourceContext {
        match self {
            Rewrite::Literal(c) | Rewrite::MarkupText(c) | Rewrite::MarkupAttribute(c) => {
                &c.context
            }
            Rewrite::Template(template) => &template.context,
        }
    }

    /// Every text this rewrite (and its nested rewrites) needs a key for,
    /// in source order.
    pub fn texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        self.collect_texts(&mut texts);
        texts
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Rewrite::Literal(c) | Rewrite::MarkupText(c) | Rewrite::MarkupAttribute(c) => {
                out.push(&c.text)
            }
            Rewrite::Template(template) => {
                for piece in &template.pieces {
                    match piece {
                        Piece::Text {
                            text,
                            translate: true,
                        } => out.push(text),
                        Piece::Text { .. } => {}
                        Piece::Interpolation { nested, .. } => {
                            for rewrite in nested {
                                rewrite.collect_texts(out);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Argument of an existing translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedArg {
    pub text: String,
    /// True when the argument is the source text itself rather than a key.
    pub is_text: bool,
}

/// Literal left alone because no strategy applies to its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLiteral {
    pub context: SourceContext,
    pub text: String,
    pub reason: &'static str,
}

impl UnsupportedLiteral {
    pub fn to_error(&self) -> RewriteError {
        RewriteError::UnsupportedContext {
            location: self.context.location.clone(),
            text: self.text.clone(),
            context: self.reason,
        }
    }
}

/// Literals skipped, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub not_chinese: usize,
    pub already_wrapped: usize,
    pub non_translatable: usize,
    pub unsupported: usize,
}

impl SkipCounts {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Translate => {}
            Classification::SkipNotChinese => self.not_chinese += 1,
            Classification::SkipAlreadyWrapped => self.already_wrapped += 1,
            Classification::SkipNonTranslatable => self.non_translatable += 1,
        }
    }

    pub fn add(&mut self, other: &SkipCounts) {
        self.not_chinese += other.not_chinese;
        self.already_wrapped += other.already_wrapped;
        self.non_translatable += other.non_translatable;
        self.unsupported += other.unsupported;
    }

    pub fn total(&self) -> usize {
        self.not_chinese + self.already_wrapped + self.non_translatable + self.unsupported
    }
}

/// Everything the walker learned about one file.
#[derive(Debug, Clone, Default)]
pub struct FilePlan {
    pub file_path: String,
    pub namespace: String,
    pub rewrites: Vec<Rewrite>,
    pub wrapped: Vec<WrappedArg>,
    pub unsupported: Vec<UnsupportedLiteral>,
    pub skipped: SkipCounts,
    /// Outermost component and hook functions, in source order.
    pub scopes: Vec<ScopeInfo>,
    pub bindings: ModuleBindings,
}

impl FilePlan {
    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }

    /// Texts needing keys, in source order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.rewrites.iter().flat_map(|rewrite| rewrite.texts())
    }
}
