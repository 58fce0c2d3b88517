//! Location and context types for rewrite results.
//!
//! - `SourceLocation`: pure position (file, 1-based line and column)
//! - `SourceContext`: position plus the source line, for cargo-style reporting

use std::fmt;

/// Pure position information in a source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// Position with the source line it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

/// Line index over a file's text, mapping byte offsets to 1-based line/column.
///
/// Columns count characters, not bytes, so CJK text reports the position a
/// reader sees in the editor.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(code: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(code.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, code: &str, offset: usize) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let end = offset.min(code.len());
        let col = code
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line_idx + 1, col + 1)
    }

    /// Text of a 1-based line, without the trailing newline.
    pub fn line_text<'a>(&self, code: &'a str, line: usize) -> &'a str {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(code.len());
        code.get(start..end)
            .map(|text| text.trim_end_matches('\r'))
            .unwrap_or("")
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indentation<'a>(&self, code: &'a str, offset: usize) -> &'a str {
        let (line, _) = self.line_col(code, offset);
        let text = self.line_text(code, line);
        &text[..text.len() - text.trim_start().len()]
    }
}
