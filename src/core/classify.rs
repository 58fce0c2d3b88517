//! Lexical classification of literal text.
//!
//! Decides, from a literal's text and the structural position it occupies,
//! whether it should be wrapped. Pure: no state, no side effects.

use std::collections::HashSet;
use std::fmt;

use crate::utils::contains_cjk;

/// Outcome of classifying one literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    Translate,
    SkipNotChinese,
    SkipAlreadyWrapped,
    SkipNonTranslatable,
}

impl Classification {
    pub fn is_translate(self) -> bool {
        matches!(self, Classification::Translate)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Translate => write!(f, "translate"),
            Classification::SkipNotChinese => write!(f, "not chinese"),
            Classification::SkipAlreadyWrapped => write!(f, "already wrapped"),
            Classification::SkipNonTranslatable => write!(f, "non-translatable"),
        }
    }
}

/// Structural position of a literal, as seen by the tree walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// A runtime value: expression operand, markup text or attribute value.
    Value,
    /// Argument of the configured translation call.
    TranslationArgument,
    /// Later argument of the translation call: options, default values.
    TranslationOptions,
    /// Regex literal body or `RegExp` constructor argument.
    RegexBody,
    /// `import`/`export ... from`, `require()`, dynamic `import()`.
    ModuleSpecifier,
    Comment,
    /// Erased at compile time: types, literal types, enum initializers.
    TypeOnly,
    /// Object/class property keys and computed member access.
    PropertyKey,
    /// Argument of an ignored callee such as `console.log`.
    IgnoredCallArgument,
    /// Value of an ignored markup attribute such as `className`.
    IgnoredAttribute,
}

/// User-configured text overrides.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    /// Texts never rewritten (compared after trimming).
    pub whitelist: HashSet<String>,
    /// Texts rewritten even without CJK content (compared after trimming).
    pub force_include: HashSet<String>,
}

impl ClassifyOptions {
    pub fn new(whitelist: &[String], force_include: &[String]) -> Self {
        Self {
            whitelist: whitelist.iter().map(|s| s.trim().to_string()).collect(),
            force_include: force_include
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// Classify one literal.
///
/// Order matters: an already-wrapped argument is reported as such even when
/// it holds a plain key; text without CJK content is `SkipNotChinese` before
/// any structural rule is considered, so the structural counts only cover
/// Chinese text that was deliberately left alone.
pub fn classify(text: &str, position: Position, options: &ClassifyOptions) -> Classification {
    if position == Position::TranslationArgument {
        return Classification::SkipAlreadyWrapped;
    }

    let trimmed = text.trim();
    let forced = options.force_include.contains(trimmed);
    if !forced && !contains_cjk(text) {
        return Classification::SkipNotChinese;
    }

    if position == Position::TranslationOptions {
        return Classification::SkipAlreadyWrapped;
    }

    if position != Position::Value || options.whitelist.contains(trimmed) {
        return Classification::SkipNonTranslatable;
    }

    Classification::Translate
}
