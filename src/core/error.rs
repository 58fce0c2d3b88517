use std::io;

use thiserror::Error;

use super::SourceLocation;

/// Errors raised by the rewrite engine.
///
/// Every variant is scoped to a single file or a single literal; callers
/// report them and move on to the next file.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Malformed input. The whole file is skipped.
    #[error("{location}: {message}")]
    ParseFailure {
        location: SourceLocation,
        message: String,
    },

    /// Every disambiguation suffix for a slug is taken by other texts.
    #[error("no free key for \"{text}\": slug `{slug}` and all its suffixes are taken")]
    KeyCollisionExhausted { text: String, slug: String },

    /// Literal in a position with no rewrite strategy.
    #[error("{location}: cannot rewrite \"{text}\" inside {context}")]
    UnsupportedContext {
        location: SourceLocation,
        text: String,
        context: &'static str,
    },

    /// Two text edits cover the same bytes.
    #[error("overlapping edits at byte {offset}")]
    OverlappingEdits { offset: usize },

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RewriteError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
