//! Common utility functions shared across the codebase.

/// Checks if a character is a CJK ideograph.
///
/// Covers the unified ideograph blocks (including extensions A-F), the
/// compatibility ideographs and the radical supplements.
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c as u32,
        0x2E80..=0x2FDF        // CJK radicals supplement, Kangxi radicals
        | 0x3400..=0x4DBF      // extension A
        | 0x4E00..=0x9FFF      // unified ideographs
        | 0xF900..=0xFAFF      // compatibility ideographs
        | 0x20000..=0x2EBEF    // extensions B-F
        | 0x2F800..=0x2FA1F // compatibility supplement
    )
}

/// Checks if a character is CJK punctuation (ideographic symbols, full-width forms).
pub fn is_cjk_punctuation(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F        // CJK symbols and punctuation
        | 0xFE30..=0xFE4F      // CJK compatibility forms
        | 0xFF00..=0xFFEF // half-width and full-width forms
    )
}

/// Checks if the text contains at least one CJK ideograph or CJK punctuation character.
///
/// Returns false for empty strings and pure ASCII text.
///
/// # Examples
///
/// ```
/// use zhwrap::utils::contains_cjk;
///
/// assert!(contains_cjk("你好"));
/// assert!(contains_cjk("Hello，"));
/// assert!(contains_cjk("共 3 条"));
/// assert!(!contains_cjk("Hello"));
/// assert!(!contains_cjk("123"));
/// assert!(!contains_cjk(""));
/// ```
pub fn contains_cjk(text: &str) -> bool {
    text.chars()
        .any(|c| is_cjk_ideograph(c) || is_cjk_punctuation(c))
}

/// Byte offset of the first and one-past-last non-whitespace characters.
///
/// Returns `None` when the text is empty or whitespace only.
pub fn trimmed_range(text: &str) -> Option<(usize, usize)> {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    if start >= end {
        None
    } else {
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_contains_cjk() {
        assert!(contains_cjk("你好"));
        assert!(contains_cjk("Hello 世界"));
        assert!(contains_cjk("，"));
        assert!(contains_cjk("「引用」"));
        assert!(contains_cjk("𠀀")); // extension B

        assert!(!contains_cjk("Hello"));
        assert!(!contains_cjk("123"));
        assert!(!contains_cjk("---"));
        assert!(!contains_cjk("   "));
        assert!(!contains_cjk(""));
        assert!(!contains_cjk("café"));
    }

    #[test]
    fn test_ideograph_vs_punctuation() {
        assert!(is_cjk_ideograph('中'));
        assert!(!is_cjk_ideograph('，'));
        assert!(is_cjk_punctuation('，'));
        assert!(is_cjk_punctuation('。'));
        assert!(!is_cjk_punctuation(','));
    }

    #[test]
    fn test_trimmed_range() {
        assert_eq!(trimmed_range("  ab  "), Some((2, 4)));
        assert_eq!(trimmed_range("ab"), Some((0, 2)));
        assert_eq!(trimmed_range("\n  你好\n"), Some((3, 9)));
        assert_eq!(trimmed_range("   "), None);
        assert_eq!(trimmed_range(""), None);
    }
}
