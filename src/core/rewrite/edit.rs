//! Text splicing over the original source.

use std::ops::Range;

use crate::core::RewriteError;

/// Replace `start..end` with `text`. An empty range is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    fn shifted(&self, by: usize) -> Self {
        Self {
            start: self.start - by,
            end: self.end - by,
            text: self.text.clone(),
        }
    }
}

/// Apply edits to `code`.
///
/// Edits are ordered by position; insertions at the same offset keep their
/// given order and come before a replacement starting there. Edits that
/// overlap, or that split a character, are rejected.
pub fn apply_edits(code: &str, mut edits: Vec<TextEdit>) -> Result<String, RewriteError> {
    edits.sort_by_key(|edit| (edit.start, edit.end));

    let mut out = String::with_capacity(code.len() + edits.len() * 16);
    let mut cursor = 0;
    for edit in &edits {
        if edit.start < cursor || edit.end < edit.start {
            return Err(RewriteError::OverlappingEdits { offset: edit.start });
        }
        let unchanged = code
            .get(cursor..edit.start)
            .ok_or(RewriteError::OverlappingEdits { offset: edit.start })?;
        out.push_str(unchanged);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    let rest = code
        .get(cursor..)
        .ok_or(RewriteError::OverlappingEdits { offset: cursor })?;
    out.push_str(rest);
    Ok(out)
}

/// Apply edits lying inside `range` to that slice of `code` only.
pub fn apply_edits_in(
    code: &str,
    range: Range<usize>,
    edits: &[TextEdit],
) -> Result<String, RewriteError> {
    let slice = code
        .get(range.clone())
        .ok_or(RewriteError::OverlappingEdits { offset: range.start })?;
    let local = edits
        .iter()
        .map(|edit| {
            if edit.start < range.start || edit.end > range.end {
                Err(RewriteError::OverlappingEdits { offset: edit.start })
            } else {
                Ok(edit.shifted(range.start))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    apply_edits(slice, local)
}

/// Single-quoted JavaScript string literal for `text`.
pub fn quote_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_edits_in_any_order() {
        let code = "const a = '你好'; const b = '世界';";
        let first = code.find("'你好'").unwrap();
        let second = code.find("'世界'").unwrap();
        let edits = vec![
            TextEdit::replace(second..second + "'世界'".len(), "t('b')"),
            TextEdit::replace(first..first + "'你好'".len(), "t('a')"),
        ];
        assert_eq!(
            apply_edits(code, edits).unwrap(),
            "const a = t('a'); const b = t('b');"
        );
    }

    #[test]
    fn test_insertions_keep_order_and_precede_replacement() {
        let code = "x";
        let edits = vec![
            TextEdit::replace(0..1, "y"),
            TextEdit::insert(0, "1"),
            TextEdit::insert(0, "2"),
            TextEdit::insert(1, "3"),
        ];
        assert_eq!(apply_edits(code, edits).unwrap(), "12y3");
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let edits = vec![TextEdit::replace(0..4, "a"), TextEdit::replace(2..6, "b")];
        let err = apply_edits("0123456789", edits).unwrap_err();
        assert!(matches!(err, RewriteError::OverlappingEdits { offset: 2 }));
    }

    #[test]
    fn test_edit_splitting_a_char_is_rejected() {
        let edits = vec![TextEdit::replace(1..2, "x")];
        assert!(apply_edits("你", edits).is_err());
    }

    #[test]
    fn test_apply_edits_in_range() {
        let code = "a + (ok ? '是' : '否') + b";
        let start = code.find('(').unwrap();
        let end = code.find(')').unwrap() + 1;
        let yes = code.find("'是'").unwrap();
        let edits = vec![TextEdit::replace(yes..yes + "'是'".len(), "t('shi')")];
        assert_eq!(
            apply_edits_in(code, start..end, &edits).unwrap(),
            "(ok ? t('shi') : '否')"
        );
    }

    #[test]
    fn test_quote_js() {
        assert_eq!(quote_js("你好"), "'你好'");
        assert_eq!(quote_js("it's"), "'it\\'s'");
        assert_eq!(quote_js("a\\b\nc"), "'a\\\\b\\nc'");
        assert_eq!(quote_js("\u{0}"), "'\\u0000'");
    }
}
