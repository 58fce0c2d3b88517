use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use swc_common::{
    BytePos, FileName, Globals, SourceMap, Span, Spanned, comments::SingleThreadedComments,
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

use crate::core::{LineIndex, RewriteError, SourceContext, SourceLocation};
use crate::utils::contains_cjk;

/// Source dialect, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `.js`, `.mjs`, `.cjs` (parsed with JSX enabled, as React projects expect)
    Script,
    /// `.jsx`
    Jsx,
    /// `.ts`, `.mts`, `.cts`
    Ts,
    /// `.tsx`
    Tsx,
}

impl Dialect {
    pub fn from_path(path: &str) -> Option<Self> {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("js" | "mjs" | "cjs") => Some(Dialect::Script),
            Some("jsx") => Some(Dialect::Jsx),
            Some("ts" | "mts" | "cts") => Some(Dialect::Ts),
            Some("tsx") => Some(Dialect::Tsx),
            _ => None,
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            Dialect::Script | Dialect::Jsx => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
            Dialect::Ts | Dialect::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == Dialect::Tsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// One parsed source file.
///
/// Owns its text and AST; spans are converted to byte offsets into `code`.
pub struct ParsedSource {
    pub file_path: String,
    pub dialect: Dialect,
    pub module: Module,
    pub code: String,
    /// Comments containing CJK text (never rewritten, only counted).
    pub cjk_comment_count: usize,
    start_pos: BytePos,
    line_index: LineIndex,
}

impl ParsedSource {
    /// Byte offset into `code` for an swc position.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    pub fn range(&self, span: Span) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    pub fn slice(&self, span: Span) -> &str {
        self.code.get(self.range(span)).unwrap_or("")
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn location(&self, offset: usize) -> SourceLocation {
        let (line, col) = self.line_index.line_col(&self.code, offset);
        SourceLocation::new(&self.file_path, line, col)
    }

    pub fn context(&self, offset: usize) -> SourceContext {
        let location = self.location(offset);
        let source_line = self.line_index.line_text(&self.code, location.line);
        SourceContext::new(location, source_line)
    }
}

/// Parse a JS/TS/JSX/TSX source string.
///
/// Both fatal and recovered parser errors are a `ParseFailure`: a file the
/// parser had to guess about is never rewritten.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource, RewriteError> {
    use swc_common::GLOBALS;

    let dialect = Dialect::from_path(file_path).unwrap_or(Dialect::Tsx);
    let source_map = Arc::new(SourceMap::default());
    let line_index = LineIndex::new(&code);

    // Per-thread swc globals
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map
            .new_source_file(FileName::Real(file_path.into()).into(), code.clone());
        let start_pos = source_file.start_pos;

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            dialect.syntax(),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let failure = |span: Span, message: String| {
            let offset = span.lo.0.saturating_sub(start_pos.0) as usize;
            let (line, col) = line_index.line_col(&code, offset);
            RewriteError::ParseFailure {
                location: SourceLocation::new(file_path, line, col),
                message,
            }
        };

        let module = parser
            .parse_module()
            .map_err(|e| failure(e.span(), e.kind().msg().to_string()))?;

        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(failure(e.span(), e.kind().msg().to_string()));
        }

        let cjk_comment_count = {
            let (leading, trailing) = comments.borrow_all();
            leading
                .values()
                .chain(trailing.values())
                .flatten()
                .filter(|comment| contains_cjk(&comment.text))
                .count()
        };

        Ok(ParsedSource {
            file_path: file_path.to_string(),
            dialect,
            module,
            code: code.clone(),
            cjk_comment_count,
            start_pos,
            line_index: line_index.clone(),
        })
    })
}
